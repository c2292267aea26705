//! Domain models and value objects

use std::fmt;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

/// Stable identifier of a news item, derived from its title and link
///
/// Lowercase hex SHA-256, so always 64 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Derive the identifier for a (title, link) pair
    pub fn derive(title: &str, link: &str) -> Self {
        let mut hasher = Sha256::new();
        // Length prefixes keep ("ab", "c") and ("a", "bc") apart
        hasher.update((title.len() as u64).to_le_bytes());
        hasher.update(title.as_bytes());
        hasher.update((link.len() as u64).to_le_bytes());
        hasher.update(link.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Wrap an identifier previously produced by [`ItemId::derive`]
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A configured news feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    /// Display name, also used to group the digest
    pub name: String,
    /// Feed URL
    pub url: String,
}

impl FeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A raw feed entry as handed over by the feed fetcher
///
/// Every field is optional: feeds in the wild omit any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub published: Option<String>,
    pub updated: Option<String>,
}

/// A news item accepted into the current digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Name of the originating feed
    pub source: String,
    pub title: String,
    pub link: String,
    /// Plain-text summary, truncated for display
    pub summary: String,
    /// Timestamp exactly as the feed reported it
    pub published: String,
    /// Keywords that triggered inclusion, in keyword-list order
    pub matched_keywords: Vec<String>,
}

/// Metadata persisted for every item that was surfaced once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeenRecord {
    pub id: ItemId,
    pub source: String,
    pub title: String,
    pub link: String,
    pub published: String,
    /// Summary as the feed delivered it, never truncated
    pub summary: String,
    #[serde(with = "time::serde::rfc3339")]
    pub first_seen: OffsetDateTime,
}

/// A rendered digest ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDigest {
    pub subject: String,
    pub html: String,
    pub item_count: usize,
    pub source_count: usize,
}

/// Settings for the authenticated mail relay
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub host: String,
    pub port: u16,
    /// Sender address, also the login name
    pub sender: String,
    pub credential: SecretString,
    /// Upper bound on every network wait of one session
    pub timeout: Duration,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            sender: String::new(),
            credential: SecretString::new(String::new().into()),
            timeout: Duration::from_secs(30),
        }
    }
}

/// A single message handed to the mail transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// When new items are marked as seen relative to delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryGuarantee {
    /// Record during ingestion; a failed send loses those items
    #[default]
    AtMostOnce,
    /// Record only after the digest was sent; a failed send repeats them
    AtLeastOnce,
}
