//! Per-source classification results.
//!
//! Each lookup produces either a successful classification or a failure
//! reason. A failure is never collapsed into a negative "not burner" result.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Line-type code the authority uses for virtual numbers.
pub const NON_FIXED_VOIP: &str = "nonFixedVoip";
/// Line-type code the authority uses for cellular numbers.
pub const MOBILE: &str = "mobile";

/// Label assigned from the reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocalLabel {
    /// Company matched a VoIP/CLEC keyword
    BurnerVoip,
    /// Company matched a facilities-based mobile carrier keyword
    RealMobile,
    /// Row found, company matched no keyword
    LandlineRegional,
    /// No row for the exchange key
    NotFound,
}

impl LocalLabel {
    pub fn is_burner(self) -> bool {
        matches!(self, Self::BurnerVoip)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BurnerVoip => "BURNER/VoIP",
            Self::RealMobile => "REAL/Mobile",
            Self::LandlineRegional => "LANDLINE/Regional",
            Self::NotFound => "Not Found",
        }
    }
}

impl fmt::Display for LocalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successful reference table classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalMatch {
    pub exchange_key: String,
    /// Upper-cased company name, `None` when no row matched
    pub provider: Option<String>,
    pub label: LocalLabel,
    pub is_burner: bool,
}

impl LocalMatch {
    pub fn new(
        exchange_key: impl Into<String>,
        provider: Option<String>,
        label: LocalLabel,
    ) -> Self {
        Self {
            exchange_key: exchange_key.into(),
            provider,
            label,
            is_burner: label.is_burner(),
        }
    }

    pub fn not_found(exchange_key: impl Into<String>) -> Self {
        Self::new(exchange_key, None, LocalLabel::NotFound)
    }
}

/// Outcome of the reference table lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LocalClassification {
    Success(LocalMatch),
    Failure { reason: String },
}

impl LocalClassification {
    pub fn failure(reason: impl fmt::Display) -> Self {
        Self::Failure {
            reason: reason.to_string(),
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// True only for a successful burner classification.
    pub fn is_burner(&self) -> bool {
        matches!(self, Self::Success(m) if m.is_burner)
    }

    pub fn matched(&self) -> Option<&LocalMatch> {
        match self {
            Self::Success(m) => Some(m),
            Self::Failure { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { reason } => Some(reason),
        }
    }
}

/// A successful authority classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMatch {
    pub carrier_name: Option<String>,
    /// Raw line-type code, e.g. `mobile`, `nonFixedVoip`, `landline`
    pub line_type: Option<String>,
    pub label: String,
    pub is_burner: bool,
    pub formatted_number: String,
}

impl RemoteMatch {
    /// Derive label and burner flag from the authority's line-type code.
    pub fn from_line_type(
        formatted_number: impl Into<String>,
        carrier_name: Option<String>,
        line_type: Option<String>,
    ) -> Self {
        let line_type = line_type.filter(|t| !t.trim().is_empty());
        let is_burner = line_type.as_deref() == Some(NON_FIXED_VOIP);
        let label = match line_type.as_deref() {
            Some(NON_FIXED_VOIP) => "BURNER/VIRTUAL".to_string(),
            Some(MOBILE) => "REAL MOBILE".to_string(),
            Some(other) => other.to_uppercase(),
            None => "UNKNOWN".to_string(),
        };

        Self {
            carrier_name,
            line_type,
            label,
            is_burner,
            formatted_number: formatted_number.into(),
        }
    }
}

/// Outcome of the authority lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RemoteClassification {
    Success(RemoteMatch),
    Failure { reason: String },
}

impl RemoteClassification {
    pub fn failure(reason: impl fmt::Display) -> Self {
        Self::Failure {
            reason: reason.to_string(),
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// True only for a successful burner classification.
    pub fn is_burner(&self) -> bool {
        matches!(self, Self::Success(m) if m.is_burner)
    }

    /// Successful and carrying a line type, so it can settle the verdict.
    pub fn is_decisive(&self) -> bool {
        matches!(self, Self::Success(m) if m.line_type.is_some())
    }

    pub fn matched(&self) -> Option<&RemoteMatch> {
        match self {
            Self::Success(m) => Some(m),
            Self::Failure { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { reason } => Some(reason),
        }
    }
}
