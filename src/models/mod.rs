// src/models/mod.rs

//! Domain models for the burner checker.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod classification;
mod config;
mod phone;
mod verdict;

// Re-export all public types
pub use classification::{
    LocalClassification, LocalLabel, LocalMatch, MOBILE, NON_FIXED_VOIP, RemoteClassification,
    RemoteMatch,
};
pub use config::{
    ACCOUNT_SID_ENV, AUTH_TOKEN_ENV, AuthorityConfig, ClassifierConfig, Config, HistoryConfig,
    ReferenceConfig,
};
pub use phone::{MIN_DIGITS, PhoneNumber};
pub use verdict::{Source, Verdict};
