//! JSON file backed answer cache

use super::AnswerCache;
use super::types::{CacheStatistics, StatsRecorder};
use crate::error::{PonderError, PonderResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

type Entries = BTreeMap<String, String>;

/// Answer cache persisted as one flat, pretty-printed JSON object
///
/// The file is re-read on every lookup so entries written by another process
/// become visible without a restart. Stores are read-merge-write and replace
/// the file atomically through a sibling temporary file.
pub struct JsonFileCache {
    path: PathBuf,
    seed: Entries,
    write_lock: Mutex<()>,
    stats: StatsRecorder,
}

impl JsonFileCache {
    /// Create a cache backed by the given file; the file need not exist
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            seed: Entries::new(),
            write_lock: Mutex::new(()),
            stats: StatsRecorder::default(),
        }
    }

    /// Entries written to the file the first time it is found missing
    pub fn with_seed<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.seed = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All readable entries, in key order
    ///
    /// An unreadable file yields an empty map, matching `lookup`.
    pub async fn entries(&self) -> Entries {
        self.ensure_seeded().await;
        match self.read_entries().await {
            Ok(Some(entries)) => entries,
            Ok(None) => Entries::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cache file unreadable");
                Entries::new()
            }
        }
    }

    /// `Ok(None)` when the file does not exist
    async fn read_entries(&self) -> PonderResult<Option<Entries>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PonderError::cache_with_path(
                    format!("failed to read cache file: {}", e),
                    self.path.display().to_string(),
                ));
            }
        };

        let entries: Entries = serde_json::from_str(&content).map_err(|e| {
            PonderError::cache_with_path(
                format!("cache file is not a flat string map: {}", e),
                self.path.display().to_string(),
            )
        })?;
        Ok(Some(entries))
    }

    async fn write_entries(&self, entries: &Entries) -> PonderResult<()> {
        let path_str = self.path.display().to_string();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                PonderError::cache_with_path(
                    format!("failed to create cache directory: {}", e),
                    path_str.clone(),
                )
            })?;
        }

        let content = serde_json::to_string_pretty(entries)?;
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "cache.json".to_string());
        let temp_path = self
            .path
            .with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

        fs::write(&temp_path, content).await.map_err(|e| {
            PonderError::cache_with_path(
                format!("failed to write cache file: {}", e),
                path_str.clone(),
            )
        })?;

        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(PonderError::cache_with_path(
                format!("failed to replace cache file: {}", e),
                path_str,
            ));
        }

        Ok(())
    }

    /// Write the seed entries if the file is missing
    async fn ensure_seeded(&self) {
        if self.seed.is_empty() {
            return;
        }

        let _guard = self.write_lock.lock().await;
        if fs::try_exists(&self.path).await.unwrap_or(true) {
            return;
        }

        match self.write_entries(&self.seed).await {
            Ok(()) => debug!(
                path = %self.path.display(),
                entries = self.seed.len(),
                "seeded cache file"
            ),
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to seed cache file"),
        }
    }

    async fn merge_and_write(&self, key: &str, value: &str) -> PonderResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut entries = match self.read_entries().await {
            Ok(Some(entries)) => entries,
            Ok(None) => self.seed.clone(),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "replacing unreadable cache file"
                );
                self.seed.clone()
            }
        };

        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries).await
    }
}

impl std::fmt::Debug for JsonFileCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileCache")
            .field("path", &self.path)
            .field("seed_entries", &self.seed.len())
            .finish()
    }
}

#[async_trait]
impl AnswerCache for JsonFileCache {
    async fn lookup(&self, key: &str) -> Option<String> {
        self.ensure_seeded().await;

        let value = match self.read_entries().await {
            Ok(Some(entries)) => entries.get(key).cloned(),
            Ok(None) => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cache lookup degraded to miss");
                None
            }
        };

        self.stats.record_lookup(value.is_some());
        debug!(key, hit = value.is_some(), "cache lookup");
        value
    }

    async fn store(&self, key: &str, value: &str) -> PonderResult<()> {
        let result = self.merge_and_write(key, value).await;
        self.stats.record_store(result.is_ok());
        if result.is_ok() {
            debug!(key, path = %self.path.display(), "cache entry stored");
        }
        result
    }

    fn statistics(&self) -> CacheStatistics {
        self.stats.snapshot()
    }
}
