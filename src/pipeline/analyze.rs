// src/pipeline/analyze.rs

//! Single-number analysis pipeline.

use crate::error::Result;
use crate::models::Verdict;
use crate::services::Analyzer;
use crate::storage::HistoryStorage;

/// Analyze `phone` and append the verdict to `history` when given.
///
/// A history write failure is logged; the verdict is still returned.
pub async fn run_analysis(
    analyzer: &Analyzer,
    history: Option<&dyn HistoryStorage>,
    phone: &str,
) -> Result<Verdict> {
    let verdict = analyzer.analyze(phone).await?;

    if let Some(history) = history {
        if let Err(e) = history.append(&verdict).await {
            log::warn!("Failed to save analysis of {}: {}", verdict.phone, e);
        }
    }

    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::error::AppError;
    use crate::services::{
        Columns, KeywordClassifier, LineTypeAuthority, LineTypeReport, ReferenceIndex,
    };
    use crate::storage::LocalStorage;

    struct Offline;

    #[async_trait]
    impl LineTypeAuthority for Offline {
        async fn lookup(&self, _e164: &str) -> Result<LineTypeReport> {
            Err(AppError::authority("offline"))
        }
    }

    fn analyzer() -> Analyzer {
        let table = "NPA-NXX\tCompany\n985-267\tTelnyx LLC\n";
        let index = ReferenceIndex::from_content(table, &Columns::default()).unwrap();
        Analyzer::new(
            Arc::new(index),
            Arc::new(Offline),
            KeywordClassifier::default(),
            Duration::from_secs(1),
        )
    }

    #[tokio::test]
    async fn test_saves_verdict() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("history.json"));

        let verdict = run_analysis(&analyzer(), Some(&storage), "9852679258")
            .await
            .unwrap();
        assert!(verdict.is_burner);

        let history = storage.list().await.unwrap();
        assert_eq!(history, vec![verdict]);
    }

    #[tokio::test]
    async fn test_invalid_number_is_not_saved() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("history.json"));

        assert!(run_analysis(&analyzer(), Some(&storage), "555").await.is_err());
        assert!(storage.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_without_history() {
        let verdict = run_analysis(&analyzer(), None, "985 267 0000").await.unwrap();
        assert_eq!(verdict.phone.exchange_key, "985-267");
    }
}
