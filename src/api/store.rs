// Player record store interface and in-memory backend

use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::models::player::RawRecord;

/// Key-value store of raw player records, keyed by username
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Fetch one record
    async fn get(&self, username: &str) -> Result<Option<RawRecord>>;

    /// Overwrite the whole record for a player (last write wins)
    async fn put(&self, username: &str, record: RawRecord) -> Result<()>;

    /// Read every record, across all pages
    async fn scan_all(&self) -> Result<Vec<RawRecord>>;
}

/// Process-local store. Scans return records in username order.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, RawRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatsStore for MemoryStore {
    async fn get(&self, username: &str) -> Result<Option<RawRecord>> {
        Ok(self.records.read().await.get(username).cloned())
    }

    async fn put(&self, username: &str, record: RawRecord) -> Result<()> {
        self.records
            .write()
            .await
            .insert(username.to_string(), record);
        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<RawRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }
}
