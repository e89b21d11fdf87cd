//! Final reconciled analysis record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LocalClassification, PhoneNumber, RemoteClassification};

/// Combined burner decision for one phone number.
///
/// Both sub-results are kept even when they did not decide the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub phone: PhoneNumber,
    pub is_burner: bool,
    pub local: LocalClassification,
    pub remote: RemoteClassification,
    pub timestamp: DateTime<Utc>,
}

impl Verdict {
    /// Which source decided `is_burner`.
    pub fn decided_by(&self) -> Source {
        if self.remote.is_decisive() {
            Source::Remote
        } else {
            Source::Local
        }
    }

    /// Both sources succeeded and disagree on burner status.
    pub fn sources_disagree(&self) -> bool {
        self.local.success()
            && self.remote.success()
            && self.local.is_burner() != self.remote.is_burner()
    }
}

/// Origin of a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Local,
    Remote,
}
