//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::model::{FeedEntry, ItemId, MailSettings, OutgoingMail, RenderedDigest, SeenRecord};

/// Error type for feed retrieval
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Malformed feed: {0}")]
    Parse(String),
    #[error("Timeout")]
    Timeout,
}

/// Port for retrieving entries of a single feed
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetch all entries currently published at `url`, in feed order
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>, FeedError>;
}

/// Error type for seen-item store operations
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Port for the durable set of already surfaced items
#[async_trait]
pub trait SeenStore: Send + Sync {
    /// Check whether an item was surfaced before
    async fn exists(&self, id: &ItemId) -> Result<bool, StateError>;

    /// Insert a record; an identifier that already exists is left untouched
    async fn record(&self, record: &SeenRecord) -> Result<(), StateError>;

    /// Look up the stored metadata of an item
    async fn get(&self, id: &ItemId) -> Result<Option<SeenRecord>, StateError>;

    /// Number of stored items
    async fn count(&self) -> Result<u64, StateError>;
}

/// Error type for mail transport operations
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid address '{address}': {message}")]
    Address { address: String, message: String },
    #[error("Authentication rejected: {0}")]
    Auth(String),
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Port for delivering one message over an authenticated session
///
/// Implementations open the session, send, and close it within a single
/// call so that nothing stays connected after an error.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, settings: &MailSettings, mail: &OutgoingMail) -> Result<(), MailError>;
}

/// Error type for the local digest artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Port for keeping a local copy of the rendered digest
#[async_trait]
pub trait DigestSink: Send + Sync {
    async fn write(&self, digest: &RenderedDigest) -> Result<(), ArtifactError>;
}

/// Port for time/clock operations (enables deterministic testing)
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> OffsetDateTime;
}

/// Real clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
