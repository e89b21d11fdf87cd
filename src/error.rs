// src/error.rs

//! Unified error handling for the burner checker.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for checker operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Fewer than ten digits survived normalization
    #[error("Invalid phone number '{input}': must contain at least 10 digits, found {digits}")]
    InvalidNumber { input: String, digits: usize },

    /// Reference table could not be opened
    #[error("Reference table {path:?} unavailable: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reference table has a structural problem
    #[error("Malformed reference table at line {line}: {message}")]
    MalformedSource { line: usize, message: String },

    /// Line-type authority request failed
    #[error("Authority error: {0}")]
    Authority(String),

    /// Both the local and the remote lookup failed
    #[error("Analysis failed: local lookup: {local}; remote lookup: {remote}")]
    AnalysisFailed { local: String, remote: String },

    /// History position out of range
    #[error("Invalid history index {index} (history has {len} entries)")]
    HistoryIndex { index: usize, len: usize },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create an invalid number error.
    pub fn invalid_number(input: impl Into<String>, digits: usize) -> Self {
        Self::InvalidNumber {
            input: input.into(),
            digits,
        }
    }

    /// Create a malformed source error for a 1-based line number.
    pub fn malformed(line: usize, message: impl fmt::Display) -> Self {
        Self::MalformedSource {
            line,
            message: message.to_string(),
        }
    }

    /// Create an authority error.
    pub fn authority(message: impl fmt::Display) -> Self {
        Self::Authority(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
