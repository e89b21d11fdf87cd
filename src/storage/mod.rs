//! Storage abstractions for analysis history.
//!
//! History is an ordered list of verdicts, appended on each saved analysis,
//! with point deletion by position and a full clear.
//!
//! ```text
//! phone_analysis_history.json   # JSON array, oldest first
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Verdict;

// Re-export for convenience
pub use local::LocalStorage;

/// Trait for history storage backends.
#[async_trait]
pub trait HistoryStorage: Send + Sync {
    /// Append a verdict, returning the new history length.
    async fn append(&self, verdict: &Verdict) -> Result<usize>;

    /// All verdicts, oldest first.
    async fn list(&self) -> Result<Vec<Verdict>>;

    /// Remove the verdict at `index`.
    async fn delete(&self, index: usize) -> Result<Verdict>;

    /// Remove every verdict, returning how many were removed.
    async fn clear(&self) -> Result<usize>;
}
