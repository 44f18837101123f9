//! In-memory answer cache

use super::AnswerCache;
use super::types::{CacheStatistics, StatsRecorder};
use crate::error::PonderResult;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Answer cache that lives only as long as the process
///
/// Used by tests as a substitute for [`super::JsonFileCache`] and by one-off
/// runs that should not touch disk.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
    stats: StatsRecorder,
}

impl MemoryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache pre-populated with entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: RwLock::new(map),
            stats: StatsRecorder::default(),
        }
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Read a value without touching the statistics
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }
}

#[async_trait]
impl AnswerCache for MemoryCache {
    async fn lookup(&self, key: &str) -> Option<String> {
        let value = self.entries.read().get(key).cloned();
        self.stats.record_lookup(value.is_some());
        value
    }

    async fn store(&self, key: &str, value: &str) -> PonderResult<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        self.stats.record_store(true);
        Ok(())
    }

    fn statistics(&self) -> CacheStatistics {
        self.stats.snapshot()
    }
}
