//! HTTP feed fetcher: reqwest for transport, feed-rs for RSS/Atom/JSON Feed

use async_trait::async_trait;
use defence_digest_domain::{FeedEntry, FeedError, FeedFetcher};
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("defence-digest/", env!("CARGO_PKG_VERSION"));

/// Fetches and parses feeds over HTTP(S)
pub struct HttpFeedFetcher {
    client: Client,
}

impl HttpFeedFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>, FeedError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FeedError::Timeout
            } else {
                FeedError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FeedError::Timeout
            } else {
                FeedError::Network(e.to_string())
            }
        })?;

        let feed =
            feed_rs::parser::parse(&bytes[..]).map_err(|e| FeedError::Parse(e.to_string()))?;

        tracing::debug!(url = %url, entries = feed.entries.len(), "Parsed feed");

        Ok(feed.entries.into_iter().map(to_entry).collect())
    }
}

fn to_entry(entry: feed_rs::model::Entry) -> FeedEntry {
    FeedEntry {
        title: entry.title.map(|t| t.content),
        link: article_link(entry.links),
        summary: entry.summary.map(|t| t.content),
        description: entry.content.and_then(|c| c.body),
        published: entry.published.map(|d| d.to_rfc2822()),
        updated: entry.updated.map(|d| d.to_rfc2822()),
    }
}

/// The entry's article link: first `alternate` (or rel-less) link, else the first link
fn article_link(links: Vec<feed_rs::model::Link>) -> Option<String> {
    let alternate = links
        .iter()
        .position(|l| l.rel.as_deref().is_none_or(|rel| rel == "alternate"));
    links
        .into_iter()
        .nth(alternate.unwrap_or(0))
        .map(|l| l.href)
}
