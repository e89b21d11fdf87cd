//! Local filesystem storage implementation.
//!
//! Keeps the whole history in one JSON file. Writes go to a temp file that
//! is renamed over the original. A corrupt history file is moved aside to
//! `<name>.corrupt` and treated as empty.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::Verdict;
use crate::storage::HistoryStorage;

/// JSON file history backend.
#[derive(Clone)]
pub struct LocalStorage {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl LocalStorage {
    /// Create a LocalStorage backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn write_all(&self, verdicts: &[Verdict]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(verdicts)?;
        self.write_bytes(&bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read the history, setting aside a file that does not parse.
    async fn read_all(&self) -> Result<Vec<Verdict>> {
        let Some(bytes) = self.read_bytes().await? else {
            return Ok(Vec::new());
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        match serde_json::from_slice(&bytes) {
            Ok(verdicts) => Ok(verdicts),
            Err(e) => {
                let aside = self.path.with_extension("corrupt");
                log::warn!(
                    "History file {} is unreadable ({}); moving it to {}",
                    self.path.display(),
                    e,
                    aside.display()
                );
                tokio::fs::rename(&self.path, &aside).await?;
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait]
impl HistoryStorage for LocalStorage {
    async fn append(&self, verdict: &Verdict) -> Result<usize> {
        let _guard = self.lock.lock().await;
        let mut verdicts = self.read_all().await?;
        verdicts.push(verdict.clone());
        self.write_all(&verdicts).await?;
        log::info!(
            "Saved analysis of {} to {} ({} entries)",
            verdict.phone,
            self.path.display(),
            verdicts.len()
        );
        Ok(verdicts.len())
    }

    async fn list(&self) -> Result<Vec<Verdict>> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }

    async fn delete(&self, index: usize) -> Result<Verdict> {
        let _guard = self.lock.lock().await;
        let mut verdicts = self.read_all().await?;
        if index >= verdicts.len() {
            return Err(AppError::HistoryIndex {
                index,
                len: verdicts.len(),
            });
        }

        let removed = verdicts.remove(index);
        self.write_all(&verdicts).await?;
        log::info!("Deleted history entry {} ({})", index, removed.phone);
        Ok(removed)
    }

    async fn clear(&self) -> Result<usize> {
        let _guard = self.lock.lock().await;
        let removed = self.read_all().await?.len();
        self.write_all(&[]).await?;
        log::info!("Cleared {} history entries", removed);
        Ok(removed)
    }
}
