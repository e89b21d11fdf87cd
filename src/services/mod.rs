//! Service layer for the burner checker.
//!
//! This module contains the business logic for:
//! - Carrier keyword classification (`KeywordClassifier`)
//! - Reference table lookups (`ReferenceTable`, `ReferenceIndex`)
//! - Line-type authority lookups (`TwilioAuthority`)
//! - Reconciliation of both sources (`reconcile`)
//! - The combined analysis entry point (`Analyzer`)

mod analyzer;
pub mod authority;
mod classifier;
pub mod reconcile;
pub mod reference;

pub use analyzer::Analyzer;
pub use authority::{LineTypeAuthority, LineTypeReport, TwilioAuthority};
pub use classifier::KeywordClassifier;
pub use reference::{Columns, ExchangeSource, ReferenceIndex, ReferenceTable};
