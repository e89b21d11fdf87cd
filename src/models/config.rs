//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable overriding `authority.account_sid`.
pub const ACCOUNT_SID_ENV: &str = "TWILIO_ACCOUNT_SID";
/// Environment variable overriding `authority.auth_token`.
pub const AUTH_TOKEN_ENV: &str = "TWILIO_AUTH_TOKEN";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Rate-center reference table settings
    #[serde(default)]
    pub reference: ReferenceConfig,

    /// Line-type authority client settings
    #[serde(default)]
    pub authority: AuthorityConfig,

    /// Carrier keyword sets
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Analysis history settings
    #[serde(default)]
    pub history: HistoryConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Fill authority credentials from the environment when set.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(sid) = lookup(ACCOUNT_SID_ENV).filter(|s| !s.trim().is_empty()) {
            self.authority.account_sid = Some(sid);
        }
        if let Some(token) = lookup(AUTH_TOKEN_ENV).filter(|s| !s.trim().is_empty()) {
            self.authority.auth_token = Some(token);
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.reference.path.as_os_str().is_empty() {
            return Err(AppError::validation("reference.path is empty"));
        }
        if self.reference.exchange_column.trim().is_empty() {
            return Err(AppError::validation("reference.exchange_column is empty"));
        }
        if self.reference.company_column.trim().is_empty() {
            return Err(AppError::validation("reference.company_column is empty"));
        }
        if self.authority.base_url.trim().is_empty() {
            return Err(AppError::validation("authority.base_url is empty"));
        }
        url::Url::parse(&self.authority.base_url)?;
        if self.authority.timeout_secs == 0 {
            return Err(AppError::validation("authority.timeout_secs must be > 0"));
        }
        if self.authority.user_agent.trim().is_empty() {
            return Err(AppError::validation("authority.user_agent is empty"));
        }
        if self.classifier.burner_keywords.is_empty() {
            return Err(AppError::validation("No burner keywords defined"));
        }
        if self.classifier.real_keywords.is_empty() {
            return Err(AppError::validation("No real carrier keywords defined"));
        }
        if self.history.path.as_os_str().is_empty() {
            return Err(AppError::validation("history.path is empty"));
        }
        Ok(())
    }
}

/// Reference table location and column names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Tab-delimited rate-center table
    #[serde(default = "defaults::reference_path")]
    pub path: PathBuf,

    /// Header of the `NPA-NXX` column
    #[serde(default = "defaults::exchange_column")]
    pub exchange_column: String,

    /// Header of the company name column
    #[serde(default = "defaults::company_column")]
    pub company_column: String,

    /// Load the table once into an exchange-key index
    #[serde(default)]
    pub preload_index: bool,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            path: defaults::reference_path(),
            exchange_column: defaults::exchange_column(),
            company_column: defaults::company_column(),
            preload_index: false,
        }
    }
}

/// Line-type intelligence service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorityConfig {
    /// Service root, without the `/v2/PhoneNumbers` path
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Basic-auth user
    #[serde(default)]
    pub account_sid: Option<String>,

    /// Basic-auth password
    #[serde(default)]
    pub auth_token: Option<String>,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Extra attempts for transient failures
    #[serde(default)]
    pub max_retries: usize,

    /// Initial retry delay in milliseconds
    #[serde(default = "defaults::retry_backoff")]
    pub retry_backoff_ms: u64,
}

impl AuthorityConfig {
    /// Both credentials, when configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.account_sid, &self.auth_token) {
            (Some(sid), Some(token)) if !sid.is_empty() && !token.is_empty() => {
                Some((sid.as_str(), token.as_str()))
            }
            _ => None,
        }
    }

    /// Upper bound for one lookup including every retry and backoff sleep.
    pub fn deadline(&self) -> Duration {
        let attempts = self.max_retries.min(16) as u32 + 1;
        let per_attempt = Duration::from_secs(self.timeout_secs) * attempts;
        let backoff = Duration::from_millis(self.retry_backoff_ms) * ((1u32 << attempts) - 1);
        per_attempt + backoff
    }
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            account_sid: None,
            auth_token: None,
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_retries: 0,
            retry_backoff_ms: defaults::retry_backoff(),
        }
    }
}

/// Ordered carrier keyword sets. Burner keywords are checked first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "defaults::burner_keywords")]
    pub burner_keywords: Vec<String>,

    #[serde(default = "defaults::real_keywords")]
    pub real_keywords: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            burner_keywords: defaults::burner_keywords(),
            real_keywords: defaults::real_keywords(),
        }
    }
}

/// History file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "defaults::history_path")]
    pub path: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: defaults::history_path(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Reference defaults
    pub fn reference_path() -> PathBuf {
        PathBuf::from("CoCodeAssignment_Utilized_AllStates_Public.txt")
    }
    pub fn exchange_column() -> String {
        "NPA-NXX".into()
    }
    pub fn company_column() -> String {
        "Company".into()
    }

    // Authority defaults
    pub fn base_url() -> String {
        "https://lookups.twilio.com".into()
    }
    pub fn user_agent() -> String {
        concat!("burner-checker/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn retry_backoff() -> u64 {
        250
    }

    // Classifier defaults
    pub fn burner_keywords() -> Vec<String> {
        [
            "BANDWIDTH",
            "ONVOY",
            "LEVEL 3",
            "VONAGE",
            "TELNYX",
            "COMMIO",
            "PINGER",
            "TEXTNOW",
            "GOOGLE",
            "PEERLESS",
            "SVR",
            "CLEC",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
    pub fn real_keywords() -> Vec<String> {
        [
            "WIRELESS", "T-MOBILE", "PCS", "CELLCO", "AT&T", "BELL", "VERIZON",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    // History defaults
    pub fn history_path() -> PathBuf {
        PathBuf::from("phone_analysis_history.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.authority.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.authority.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(AppError::Url(_))));
    }

    #[test]
    fn validate_rejects_empty_keyword_sets() {
        let mut config = Config::default();
        config.classifier.burner_keywords.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [reference]
            path = "data/cocodes.txt"
            preload_index = true

            [authority]
            timeout_secs = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.reference.path, PathBuf::from("data/cocodes.txt"));
        assert!(config.reference.preload_index);
        assert_eq!(config.reference.exchange_column, "NPA-NXX");
        assert_eq!(config.authority.timeout_secs, 3);
        assert_eq!(config.authority.base_url, "https://lookups.twilio.com");
        assert_eq!(config.classifier.burner_keywords[0], "BANDWIDTH");
    }

    #[test]
    fn deadline_covers_retries() {
        let mut authority = AuthorityConfig::default();
        assert_eq!(authority.deadline(), Duration::from_millis(10_250));

        authority.max_retries = 2;
        authority.timeout_secs = 1;
        authority.retry_backoff_ms = 100;
        assert_eq!(authority.deadline(), Duration::from_millis(3_700));
    }

    #[test]
    fn env_overrides_credentials() {
        let mut config = Config::default();
        assert!(config.authority.credentials().is_none());

        config.apply_env_with(|key| match key {
            ACCOUNT_SID_ENV => Some("AC123".to_string()),
            AUTH_TOKEN_ENV => Some("secret".to_string()),
            _ => None,
        });

        assert_eq!(config.authority.credentials(), Some(("AC123", "secret")));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = Config::default();
        config.authority.account_sid = Some("ACfile".to_string());
        config.apply_env_with(|_| Some("  ".to_string()));
        assert_eq!(config.authority.account_sid.as_deref(), Some("ACfile"));
    }

    #[test]
    fn load_or_default_falls_back_on_missing_file() {
        let config = Config::load_or_default("/definitely/not/here.toml");
        assert_eq!(config.history.path, PathBuf::from("phone_analysis_history.json"));
    }
}
