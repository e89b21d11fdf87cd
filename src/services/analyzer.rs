// src/services/analyzer.rs

//! Phone number analysis service.
//!
//! Normalizes the input, runs the reference table and authority lookups
//! concurrently, then reconciles both into a [`Verdict`].

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{Config, LocalClassification, PhoneNumber, RemoteClassification, Verdict};
use crate::services::authority::{LineTypeAuthority, TwilioAuthority, lookup_line_type};
use crate::services::reference::{
    Columns, ExchangeSource, ReferenceIndex, ReferenceTable, lookup_exchange,
};
use crate::services::{KeywordClassifier, reconcile};

/// Service combining the local and remote classifiers.
#[derive(Clone)]
pub struct Analyzer {
    reference: Arc<dyn ExchangeSource>,
    authority: Arc<dyn LineTypeAuthority>,
    classifier: KeywordClassifier,
    remote_deadline: Duration,
}

impl Analyzer {
    /// Create an analyzer from explicit collaborators.
    pub fn new(
        reference: Arc<dyn ExchangeSource>,
        authority: Arc<dyn LineTypeAuthority>,
        classifier: KeywordClassifier,
        remote_deadline: Duration,
    ) -> Self {
        Self {
            reference,
            authority,
            classifier,
            remote_deadline,
        }
    }

    /// Build the production analyzer described by `config`.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let reference: Arc<dyn ExchangeSource> = if config.reference.preload_index {
            let columns = Columns::from_config(&config.reference);
            Arc::new(ReferenceIndex::load(&config.reference.path, &columns).await?)
        } else {
            Arc::new(ReferenceTable::from_config(&config.reference))
        };

        Ok(Self::new(
            reference,
            Arc::new(TwilioAuthority::new(&config.authority)?),
            KeywordClassifier::from_config(&config.classifier),
            config.authority.deadline(),
        ))
    }

    /// Classify a raw phone number string.
    ///
    /// Fails with [`AppError::InvalidNumber`] before any lookup when the input
    /// has too few digits, and with [`AppError::AnalysisFailed`] when both
    /// lookups fail. A single failed lookup degrades into its `Failure` result.
    pub async fn analyze(&self, input: &str) -> Result<Verdict> {
        let phone = PhoneNumber::parse(input)?;
        log::debug!(
            "Analyzing {} (exchange {}, {})",
            phone.display(),
            phone.exchange_key,
            phone.e164
        );

        let (local, remote) = tokio::join!(self.local(&phone), self.remote(&phone));

        if let (Some(local_reason), Some(remote_reason)) =
            (local.failure_reason(), remote.failure_reason())
        {
            return Err(AppError::AnalysisFailed {
                local: local_reason.to_string(),
                remote: remote_reason.to_string(),
            });
        }

        let verdict = reconcile::reconcile(phone, local, remote, Utc::now());
        log::info!(
            "{}: {} (decided by {:?} source)",
            verdict.phone,
            if verdict.is_burner { "BURNER" } else { "not burner" },
            verdict.decided_by()
        );
        if verdict.sources_disagree() {
            log::info!("{}: local and remote sources disagree", verdict.phone);
        }

        Ok(verdict)
    }

    async fn local(&self, phone: &PhoneNumber) -> LocalClassification {
        let lookup = lookup_exchange(
            self.reference.as_ref(),
            &self.classifier,
            &phone.exchange_key,
        );
        match lookup.await {
            Ok(matched) => LocalClassification::Success(matched),
            Err(e) => {
                log::warn!("Reference lookup failed for {}: {}", phone.exchange_key, e);
                LocalClassification::failure(e)
            }
        }
    }

    async fn remote(&self, phone: &PhoneNumber) -> RemoteClassification {
        let lookup = lookup_line_type(self.authority.as_ref(), &phone.e164);
        let result = match tokio::time::timeout(self.remote_deadline, lookup).await {
            Ok(result) => result,
            Err(_) => Err(AppError::authority(format!(
                "no response within {:?}",
                self.remote_deadline
            ))),
        };

        match result {
            Ok(matched) => RemoteClassification::Success(matched),
            Err(e) => {
                log::warn!("Authority lookup failed for {}: {}", phone.e164, e);
                RemoteClassification::failure(e)
            }
        }
    }
}
