//! SQLite seen-item store implementation

use async_trait::async_trait;
use defence_digest_domain::{ItemId, SeenRecord, SeenStore, StateError};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::path::Path;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// SQLite-backed seen-item store
pub struct SqliteSeenStore {
    pool: SqlitePool,
}

impl SqliteSeenStore {
    /// Open the store at `db_path`, creating the file and schema if needed
    pub async fn new(db_path: impl AsRef<Path>) -> Result<Self, StateError> {
        let db_path = db_path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StateError::Database(format!("Failed to create directory: {}", e))
                })?;
            }
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&db_url)
            .await
            .map_err(|e| StateError::Database(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing)
    pub async fn in_memory() -> Result<Self, StateError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| StateError::Database(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StateError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS seen_items (
                id TEXT PRIMARY KEY,
                source TEXT NOT NULL,
                title TEXT NOT NULL,
                link TEXT NOT NULL,
                published TEXT NOT NULL,
                summary TEXT NOT NULL,
                first_seen TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        Ok(())
    }

    /// Close the pool, flushing pending writes
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl SeenStore for SqliteSeenStore {
    async fn exists(&self, id: &ItemId) -> Result<bool, StateError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM seen_items WHERE id = ?")
            .bind(id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StateError::Database(e.to_string()))?;

        Ok(count.0 > 0)
    }

    async fn record(&self, record: &SeenRecord) -> Result<(), StateError> {
        let first_seen = record
            .first_seen
            .format(&Rfc3339)
            .map_err(|e| StateError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO seen_items (id, source, title, link, published, summary, first_seen)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(record.id.as_str())
        .bind(&record.source)
        .bind(&record.title)
        .bind(&record.link)
        .bind(&record.published)
        .bind(&record.summary)
        .bind(&first_seen)
        .execute(&self.pool)
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        Ok(())
    }

    async fn get(&self, id: &ItemId) -> Result<Option<SeenRecord>, StateError> {
        let row: Option<(String, String, String, String, String, String, String)> =
            sqlx::query_as(
                r#"
                SELECT id, source, title, link, published, summary, first_seen
                FROM seen_items
                WHERE id = ?
                "#,
            )
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StateError::Database(e.to_string()))?;

        match row {
            Some((id, source, title, link, published, summary, first_seen)) => {
                let first_seen = OffsetDateTime::parse(&first_seen, &Rfc3339)
                    .map_err(|e| StateError::Serialization(e.to_string()))?;

                Ok(Some(SeenRecord {
                    id: ItemId::from_stored(id),
                    source,
                    title,
                    link,
                    published,
                    summary,
                    first_seen,
                }))
            }
            None => Ok(None),
        }
    }

    async fn count(&self) -> Result<u64, StateError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM seen_items")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StateError::Database(e.to_string()))?;

        Ok(count.0.max(0) as u64)
    }
}
