// src/services/reference.rs

//! Rate-center reference table lookup.
//!
//! The table is tab-delimited with a header row naming its columns.
//! Two backends share the [`ExchangeSource`] contract:
//!
//! - [`ReferenceTable`] re-reads the file on every lookup
//! - [`ReferenceIndex`] loads it once into an immutable map

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{LocalMatch, ReferenceConfig};
use crate::services::KeywordClassifier;

/// One usable row from the reference table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRow {
    pub exchange_key: String,
    /// Upper-cased company name
    pub company: String,
}

/// Source of exchange-key to company assignments.
#[async_trait]
pub trait ExchangeSource: Send + Sync {
    /// Company of the first row whose exchange key equals `exchange_key`.
    async fn find_company(&self, exchange_key: &str) -> Result<Option<String>>;
}

/// Look up an exchange key and classify the matching company.
///
/// A missing row is a successful `NotFound` result, not an error.
pub async fn lookup_exchange(
    source: &dyn ExchangeSource,
    classifier: &KeywordClassifier,
    exchange_key: &str,
) -> Result<LocalMatch> {
    let company = source.find_company(exchange_key).await?;
    let label = classifier.classify(company.as_deref());
    log::debug!(
        "Reference lookup {}: {} ({})",
        exchange_key,
        company.as_deref().unwrap_or("no row"),
        label
    );
    Ok(LocalMatch::new(exchange_key, company, label))
}

/// Column names identifying the key and company fields.
#[derive(Debug, Clone)]
pub struct Columns {
    pub exchange: String,
    pub company: String,
}

impl Columns {
    pub fn from_config(config: &ReferenceConfig) -> Self {
        Self {
            exchange: config.exchange_column.clone(),
            company: config.company_column.clone(),
        }
    }
}

impl Default for Columns {
    fn default() -> Self {
        Self::from_config(&ReferenceConfig::default())
    }
}

/// Reference table read in full for each lookup.
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    path: PathBuf,
    columns: Columns,
}

impl ReferenceTable {
    pub fn new(path: impl Into<PathBuf>, columns: Columns) -> Self {
        Self {
            path: path.into(),
            columns,
        }
    }

    pub fn from_config(config: &ReferenceConfig) -> Self {
        Self::new(&config.path, Columns::from_config(config))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<String> {
        read_table(&self.path).await
    }
}

#[async_trait]
impl ExchangeSource for ReferenceTable {
    async fn find_company(&self, exchange_key: &str) -> Result<Option<String>> {
        let content = self.read().await?;
        for row in parse_rows(&content, &self.columns)? {
            if row.exchange_key == exchange_key {
                return Ok(Some(row.company));
            }
        }
        Ok(None)
    }
}

/// Reference table loaded once into an exchange-key map.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    entries: HashMap<String, String>,
}

impl ReferenceIndex {
    /// Load and index a table file.
    pub async fn load(path: impl AsRef<Path>, columns: &Columns) -> Result<Self> {
        let content = read_table(path.as_ref()).await?;
        let index = Self::from_content(&content, columns)?;
        log::info!(
            "Indexed {} exchange keys from {}",
            index.len(),
            path.as_ref().display()
        );
        Ok(index)
    }

    /// Index table text already in memory. The first row for a key wins.
    pub fn from_content(content: &str, columns: &Columns) -> Result<Self> {
        let mut entries = HashMap::new();
        for row in parse_rows(content, columns)? {
            entries.entry(row.exchange_key).or_insert(row.company);
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ExchangeSource for ReferenceIndex {
    async fn find_company(&self, exchange_key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(exchange_key).cloned())
    }
}

/// Read the whole table as UTF-8 text.
async fn read_table(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| AppError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

    String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
        AppError::malformed(line, "invalid UTF-8")
    })
}

/// Positions of the key and company fields within a row.
#[derive(Debug)]
struct Header {
    exchange: usize,
    company: usize,
}

impl Header {
    fn parse(line: Option<&str>, columns: &Columns) -> Result<Self> {
        let line = line
            .map(|l| l.trim_start_matches('\u{feff}'))
            .filter(|l| !l.trim().is_empty())
            .ok_or_else(|| AppError::malformed(1, "missing header row"))?;

        let names: Vec<&str> = line.split('\t').map(str::trim).collect();
        let position = |wanted: &str| {
            names
                .iter()
                .position(|name| *name == wanted.trim())
                .ok_or_else(|| AppError::malformed(1, format!("missing column '{wanted}'")))
        };

        Ok(Self {
            exchange: position(&columns.exchange)?,
            company: position(&columns.company)?,
        })
    }
}

/// Parse table text into usable rows.
///
/// Rows with an empty key or company are skipped.
pub fn parse_rows(content: &str, columns: &Columns) -> Result<Vec<ReferenceRow>> {
    let mut lines = content.lines();
    let header = Header::parse(lines.next(), columns)?;

    let rows = lines
        .filter_map(|line| {
            let fields: Vec<&str> = line.split('\t').collect();
            let exchange_key = fields.get(header.exchange)?.trim();
            let company = fields.get(header.company)?.trim();
            if exchange_key.is_empty() || company.is_empty() {
                return None;
            }
            Some(ReferenceRow {
                exchange_key: exchange_key.to_string(),
                company: company.to_uppercase(),
            })
        })
        .collect();

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LocalLabel;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const TABLE: &str = "State\t NPA-NXX \tOCN\tCompany \tRateCenter\n\
        LA\t985-267\t6529\tOnvoy, LLC - LA\tHAMMOND\n\
        LA\t985-269\t6214\tCellco Partnership DBA Verizon Wireless\tHAMMOND\n\
        LA\t985-270\t0405\tSouth Central Telephone Co\tAMITE\n\
        LA\t985-271\t\t\tAMITE\n\
        LA\t985-267\t9999\tSecond Row Telephone\tHAMMOND\n";

    async fn write_table(dir: &TempDir, content: &[u8]) -> PathBuf {
        let path = dir.path().join("cocodes.txt");
        tokio::fs::write(&path, content).await.unwrap();
        path
    }

    #[test]
    fn parse_rows_trims_header_and_uppercases_company() {
        let rows = parse_rows(TABLE, &Columns::default()).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(
            rows[0],
            ReferenceRow {
                exchange_key: "985-267".to_string(),
                company: "ONVOY, LLC - LA".to_string(),
            }
        );
    }

    #[test]
    fn missing_column_is_malformed() {
        let err = parse_rows("State\tNPA-NXX\nLA\t985-267\n", &Columns::default()).unwrap_err();
        assert!(matches!(err, AppError::MalformedSource { line: 1, .. }));
    }

    #[test]
    fn empty_table_is_malformed() {
        assert!(matches!(
            parse_rows("", &Columns::default()),
            Err(AppError::MalformedSource { .. })
        ));
    }

    #[tokio::test]
    async fn table_returns_first_matching_row() {
        let tmp = TempDir::new().unwrap();
        let path = write_table(&tmp, TABLE.as_bytes()).await;
        let table = ReferenceTable::new(path, Columns::default());

        let company = table.find_company("985-267").await.unwrap();
        assert_eq!(company.as_deref(), Some("ONVOY, LLC - LA"));
    }

    #[tokio::test]
    async fn rows_without_company_never_match() {
        let tmp = TempDir::new().unwrap();
        let path = write_table(&tmp, TABLE.as_bytes()).await;
        let table = ReferenceTable::new(path, Columns::default());

        assert_eq!(table.find_company("985-271").await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_file_is_source_unavailable() {
        let tmp = TempDir::new().unwrap();
        let table = ReferenceTable::new(tmp.path().join("absent.txt"), Columns::default());

        let err = table.find_company("985-267").await.unwrap_err();
        assert!(matches!(err, AppError::SourceUnavailable { .. }));
    }

    #[tokio::test]
    async fn invalid_utf8_reports_line() {
        let tmp = TempDir::new().unwrap();
        let mut content = b"NPA-NXX\tCompany\n985-267\tOK\n985-268\t".to_vec();
        content.extend_from_slice(&[0xff, 0xfe]);
        let table = ReferenceTable::new(write_table(&tmp, &content).await, Columns::default());

        let err = table.find_company("985-267").await.unwrap_err();
        assert!(matches!(err, AppError::MalformedSource { line: 3, .. }));
    }

    #[tokio::test]
    async fn index_matches_table_semantics() {
        let tmp = TempDir::new().unwrap();
        let path = write_table(&tmp, TABLE.as_bytes()).await;
        let table = ReferenceTable::new(&path, Columns::default());
        let index = ReferenceIndex::load(&path, &Columns::default()).await.unwrap();

        assert_eq!(index.len(), 3);
        for key in ["985-267", "985-269", "985-270", "985-271", "000-000"] {
            assert_eq!(
                index.find_company(key).await.unwrap(),
                table.find_company(key).await.unwrap(),
                "key {key}"
            );
        }
    }

    #[tokio::test]
    async fn lookup_exchange_classifies_rows() {
        let index = ReferenceIndex::from_content(TABLE, &Columns::default()).unwrap();
        let classifier = KeywordClassifier::default();

        let burner = lookup_exchange(&index, &classifier, "985-267").await.unwrap();
        assert_eq!(burner.label, LocalLabel::BurnerVoip);
        assert!(burner.is_burner);

        let mobile = lookup_exchange(&index, &classifier, "985-269").await.unwrap();
        assert_eq!(mobile.label, LocalLabel::RealMobile);

        let landline = lookup_exchange(&index, &classifier, "985-270").await.unwrap();
        assert_eq!(landline.label, LocalLabel::LandlineRegional);
        assert!(!landline.is_burner);

        let missing = lookup_exchange(&index, &classifier, "504-555").await.unwrap();
        assert_eq!(missing, LocalMatch::not_found("504-555"));
        assert_ne!(missing.label, LocalLabel::LandlineRegional);
    }
}
