// src/lib.rs

//! Burner Checker Library
//!
//! Classifies a phone number as a burner (non-fixed VoIP) or a carrier-issued
//! line by reconciling a rate-center reference table with a line-type
//! intelligence service.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

pub use error::{AppError, Result};
pub use models::{Config, PhoneNumber, Verdict};
pub use services::Analyzer;
