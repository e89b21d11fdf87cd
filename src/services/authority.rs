// src/services/authority.rs

//! Line-type intelligence lookups.
//!
//! Queries the Twilio Lookup v2 API for carrier name and line type:
//!
//! ```text
//! GET {base_url}/v2/PhoneNumbers/{e164}?Fields=line_type_intelligence
//! ```
//!
//! Transport failures, 429 and 5xx responses are retried with exponential
//! backoff up to `authority.max_retries` extra attempts. Everything else is
//! reported once as [`AppError::Authority`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{AuthorityConfig, RemoteMatch};
use crate::utils::http;

/// Carrier and line-type fields returned by an authority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineTypeReport {
    pub carrier_name: Option<String>,
    pub line_type: Option<String>,
}

/// External line-type intelligence service.
#[async_trait]
pub trait LineTypeAuthority: Send + Sync {
    /// Look up an E.164 number.
    async fn lookup(&self, e164: &str) -> Result<LineTypeReport>;
}

/// Query the authority and classify its line-type code.
pub async fn lookup_line_type(
    authority: &dyn LineTypeAuthority,
    e164: &str,
) -> Result<RemoteMatch> {
    let report = authority.lookup(e164).await?;
    let classified = RemoteMatch::from_line_type(e164, report.carrier_name, report.line_type);
    log::debug!(
        "Authority lookup {}: {} ({})",
        e164,
        classified.line_type.as_deref().unwrap_or("no line type"),
        classified.label
    );
    Ok(classified)
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    line_type_intelligence: Option<LineTypeIntelligence>,
}

#[derive(Debug, Deserialize)]
struct LineTypeIntelligence {
    #[serde(rename = "type", default)]
    line_type: Option<String>,
    #[serde(default)]
    carrier_name: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

/// One failed request attempt.
#[derive(Debug)]
struct AttemptError {
    message: String,
    transient: bool,
}

impl AttemptError {
    fn transient(message: impl fmt::Display) -> Self {
        Self {
            message: message.to_string(),
            transient: true,
        }
    }

    fn permanent(message: impl fmt::Display) -> Self {
        Self {
            message: message.to_string(),
            transient: false,
        }
    }
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Twilio Lookup v2 client.
#[derive(Debug, Clone)]
pub struct TwilioAuthority {
    client: reqwest::Client,
    base_url: url::Url,
    credentials: Option<(String, String)>,
    max_retries: usize,
    retry_backoff: Duration,
}

impl TwilioAuthority {
    /// Build a client from explicit configuration.
    pub fn new(config: &AuthorityConfig) -> Result<Self> {
        let credentials = config
            .credentials()
            .map(|(sid, token)| (sid.to_string(), token.to_string()));
        if credentials.is_none() {
            log::warn!("Authority credentials not configured; remote lookups will fail");
        }

        Ok(Self {
            client: http::create_client(config)?,
            base_url: http::with_trailing_slash(&config.base_url)?,
            credentials,
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    fn endpoint(&self, e164: &str) -> Result<url::Url> {
        Ok(self.base_url.join(&format!("v2/PhoneNumbers/{e164}"))?)
    }

    async fn fetch_once(
        &self,
        url: &url::Url,
    ) -> std::result::Result<LineTypeReport, AttemptError> {
        let Some((sid, token)) = &self.credentials else {
            return Err(AttemptError::permanent("missing account credentials"));
        };

        let response = self
            .client
            .get(url.clone())
            .query(&[("Fields", "line_type_intelligence")])
            .basic_auth(sid, Some(token))
            .send()
            .await
            .map_err(AttemptError::transient)?;

        let status = response.status();
        let body = response.text().await.map_err(AttemptError::transient)?;

        if !status.is_success() {
            let detail = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(ErrorBody {
                    code: Some(code),
                    message: Some(message),
                }) => format!("{message} (code {code})"),
                Ok(ErrorBody {
                    message: Some(message),
                    ..
                }) => message,
                _ => body.trim().chars().take(200).collect(),
            };
            let error = format!("HTTP {status}: {detail}");
            return Err(if http::is_transient_status(status) {
                AttemptError::transient(error)
            } else {
                AttemptError::permanent(error)
            });
        }

        let parsed: LookupResponse = serde_json::from_str(&body)
            .map_err(|e| AttemptError::permanent(format!("malformed response: {e}")))?;
        let intelligence = parsed.line_type_intelligence.ok_or_else(|| {
            AttemptError::permanent("malformed response: missing line_type_intelligence")
        })?;

        if let Some(code) = intelligence.error_code {
            log::debug!("Line type intelligence reported error code {code}");
        }

        Ok(LineTypeReport {
            carrier_name: intelligence.carrier_name,
            line_type: intelligence.line_type,
        })
    }
}

#[async_trait]
impl LineTypeAuthority for TwilioAuthority {
    async fn lookup(&self, e164: &str) -> Result<LineTypeReport> {
        let url = self.endpoint(e164)?;
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.retry_backoff)
            .with_max_times(self.max_retries);

        (|| self.fetch_once(&url))
            .retry(backoff)
            .when(|e: &AttemptError| e.transient)
            .notify(|e: &AttemptError, wait: Duration| {
                log::warn!("Authority lookup failed ({e}); retrying in {wait:?}");
            })
            .await
            .map_err(AppError::authority)
    }
}
