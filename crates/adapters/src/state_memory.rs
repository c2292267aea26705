//! In-memory seen-item store for tests and pipelines without a database file

use async_trait::async_trait;
use defence_digest_domain::{ItemId, SeenRecord, SeenStore, StateError};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory seen-item store implementation
#[derive(Default)]
pub struct InMemorySeenStore {
    records: RwLock<HashMap<ItemId, SeenRecord>>,
}

impl InMemorySeenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SeenStore for InMemorySeenStore {
    async fn exists(&self, id: &ItemId) -> Result<bool, StateError> {
        let records = self
            .records
            .read()
            .map_err(|e| StateError::Database(e.to_string()))?;
        Ok(records.contains_key(id))
    }

    async fn record(&self, record: &SeenRecord) -> Result<(), StateError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StateError::Database(e.to_string()))?;
        records
            .entry(record.id.clone())
            .or_insert_with(|| record.clone());
        Ok(())
    }

    async fn get(&self, id: &ItemId) -> Result<Option<SeenRecord>, StateError> {
        let records = self
            .records
            .read()
            .map_err(|e| StateError::Database(e.to_string()))?;
        Ok(records.get(id).cloned())
    }

    async fn count(&self) -> Result<u64, StateError> {
        let records = self
            .records
            .read()
            .map_err(|e| StateError::Database(e.to_string()))?;
        Ok(records.len() as u64)
    }
}
