//! Feed retrieval adapters

mod http;

pub use http::HttpFeedFetcher;

use async_trait::async_trait;
use defence_digest_domain::{FeedEntry, FeedError, FeedFetcher};
use std::collections::HashMap;

/// Stub feed fetcher serving fixed entries per URL
///
/// Unknown URLs fail with a network error, like an unreachable host.
#[derive(Debug, Default)]
pub struct StubFeedFetcher {
    feeds: HashMap<String, Vec<FeedEntry>>,
}

impl StubFeedFetcher {
    /// Create a stub where every URL is unreachable
    pub fn empty() -> Self {
        Self::default()
    }

    /// Serve `entries` for `url`
    pub fn with_feed(mut self, url: impl Into<String>, entries: Vec<FeedEntry>) -> Self {
        self.feeds.insert(url.into(), entries);
        self
    }
}

#[async_trait]
impl FeedFetcher for StubFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>, FeedError> {
        self.feeds
            .get(url)
            .cloned()
            .ok_or_else(|| FeedError::Network(format!("No stub feed for {}", url)))
    }
}
