//! Pipeline entry points for checker operations.
//!
//! - `run_analysis`: Analyze one number and record it in history
//! - `report`: Plain-text rendering of verdicts and history

pub mod analyze;
pub mod report;

pub use analyze::run_analysis;
