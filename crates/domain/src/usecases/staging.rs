//! Staged overlay over a seen-item store
//!
//! New records are buffered in memory and only reach the underlying store on
//! [`StagedSeenStore::commit`]. Lookups see both layers, so duplicates within
//! a run are still suppressed.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::{
    model::{ItemId, SeenRecord},
    ports::{SeenStore, StateError},
};

pub struct StagedSeenStore<'a, S: SeenStore + ?Sized> {
    base: &'a S,
    pending: Mutex<Vec<SeenRecord>>,
}

impl<'a, S: SeenStore + ?Sized> StagedSeenStore<'a, S> {
    pub fn new(base: &'a S) -> Self {
        Self {
            base,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Number of records waiting for commit
    pub fn pending_len(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Write all buffered records to the underlying store
    pub async fn commit(self) -> Result<usize, StateError> {
        let pending = self
            .pending
            .into_inner()
            .map_err(|e| StateError::Database(e.to_string()))?;
        for record in &pending {
            self.base.record(record).await?;
        }
        Ok(pending.len())
    }

    fn pending_get(&self, id: &ItemId) -> Result<Option<SeenRecord>, StateError> {
        let pending = self
            .pending
            .lock()
            .map_err(|e| StateError::Database(e.to_string()))?;
        Ok(pending.iter().find(|r| &r.id == id).cloned())
    }
}

#[async_trait]
impl<'a, S: SeenStore + ?Sized> SeenStore for StagedSeenStore<'a, S> {
    async fn exists(&self, id: &ItemId) -> Result<bool, StateError> {
        if self.pending_get(id)?.is_some() {
            return Ok(true);
        }
        self.base.exists(id).await
    }

    async fn record(&self, record: &SeenRecord) -> Result<(), StateError> {
        if self.exists(&record.id).await? {
            return Ok(());
        }
        let mut pending = self
            .pending
            .lock()
            .map_err(|e| StateError::Database(e.to_string()))?;
        pending.push(record.clone());
        Ok(())
    }

    async fn get(&self, id: &ItemId) -> Result<Option<SeenRecord>, StateError> {
        match self.pending_get(id)? {
            Some(record) => Ok(Some(record)),
            None => self.base.get(id).await,
        }
    }

    async fn count(&self) -> Result<u64, StateError> {
        Ok(self.base.count().await? + self.pending_len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::ingest::tests::FakeSeenStore;
    use time::OffsetDateTime;

    fn record(title: &str) -> SeenRecord {
        SeenRecord {
            id: ItemId::derive(title, "https://example.com"),
            source: "S".to_string(),
            title: title.to_string(),
            link: "https://example.com".to_string(),
            published: String::new(),
            summary: String::new(),
            first_seen: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn test_staged_records_are_visible_but_not_written() {
        let base = FakeSeenStore::default();
        let staged = StagedSeenStore::new(&base);

        staged.record(&record("a")).await.unwrap();

        assert!(staged.exists(&record("a").id).await.unwrap());
        assert!(!base.exists(&record("a").id).await.unwrap());
        assert_eq!(staged.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_commit_writes_through() {
        let base = FakeSeenStore::default();
        let staged = StagedSeenStore::new(&base);
        staged.record(&record("a")).await.unwrap();
        staged.record(&record("b")).await.unwrap();
        staged.record(&record("a")).await.unwrap();

        assert_eq!(staged.commit().await.unwrap(), 2);
        assert_eq!(base.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_existing_base_record_is_not_staged_again() {
        let base = FakeSeenStore::default();
        base.record(&record("a")).await.unwrap();
        let staged = StagedSeenStore::new(&base);

        staged.record(&record("a")).await.unwrap();
        assert_eq!(staged.pending_len(), 0);
    }
}
