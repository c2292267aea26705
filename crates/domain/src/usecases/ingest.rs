//! Ingest use case - turns one feed into newly accepted items

use crate::{
    matcher::KeywordMatcher,
    model::{FeedEntry, FeedSource, Item, ItemId, SeenRecord},
    ports::{Clock, FeedFetcher, SeenStore, StateError},
    text::{plain_text, truncate_chars},
};

/// Maximum summary length shown in the digest
pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 300;

/// Title used when an entry has none
pub const UNTITLED: &str = "No title";

/// An extracted field: candidate entry fields in priority order plus a default
struct FieldFallback {
    candidates: &'static [fn(&FeedEntry) -> Option<&str>],
    default: &'static str,
}

impl FieldFallback {
    fn extract<'a>(&self, entry: &'a FeedEntry) -> &'a str {
        self.candidates
            .iter()
            .filter_map(|field| field(entry))
            .find(|value| !value.trim().is_empty())
            .unwrap_or(self.default)
    }
}

fn title(e: &FeedEntry) -> Option<&str> {
    e.title.as_deref()
}

fn link(e: &FeedEntry) -> Option<&str> {
    e.link.as_deref()
}

fn summary(e: &FeedEntry) -> Option<&str> {
    e.summary.as_deref()
}

fn description(e: &FeedEntry) -> Option<&str> {
    e.description.as_deref()
}

fn published(e: &FeedEntry) -> Option<&str> {
    e.published.as_deref()
}

fn updated(e: &FeedEntry) -> Option<&str> {
    e.updated.as_deref()
}

const TITLE: FieldFallback = FieldFallback {
    candidates: &[title],
    default: UNTITLED,
};

const LINK: FieldFallback = FieldFallback {
    candidates: &[link],
    default: "",
};

const SUMMARY: FieldFallback = FieldFallback {
    candidates: &[summary, description],
    default: "",
};

const PUBLISHED: FieldFallback = FieldFallback {
    candidates: &[published, updated],
    default: "",
};

/// Errors that abort ingestion of a single source
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("State error: {0}")]
    State(#[from] StateError),
}

/// Filters one feed against the keyword list and the seen-item store
pub struct FeedIngestor<'a, F, S, C>
where
    F: FeedFetcher + ?Sized,
    S: SeenStore + ?Sized,
    C: Clock + ?Sized,
{
    fetcher: &'a F,
    store: &'a S,
    clock: &'a C,
    matcher: &'a KeywordMatcher,
    summary_max_chars: usize,
}

impl<'a, F, S, C> FeedIngestor<'a, F, S, C>
where
    F: FeedFetcher + ?Sized,
    S: SeenStore + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(fetcher: &'a F, store: &'a S, clock: &'a C, matcher: &'a KeywordMatcher) -> Self {
        Self {
            fetcher,
            store,
            clock,
            matcher,
            summary_max_chars: DEFAULT_SUMMARY_MAX_CHARS,
        }
    }

    pub fn with_summary_max_chars(mut self, max_chars: usize) -> Self {
        self.summary_max_chars = max_chars;
        self
    }

    /// Fetch `source` and return the entries that are both relevant and new
    ///
    /// Accepted items are recorded in the store before they are returned.
    /// Retrieval failures are logged and yield no items.
    pub async fn ingest(&self, source: &FeedSource) -> Result<Vec<Item>, IngestError> {
        tracing::info!(source = %source.name, url = %source.url, "Fetching feed");

        let entries = match self.fetcher.fetch(&source.url).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(source = %source.name, error = %e, "Failed to fetch feed");
                return Ok(vec![]);
            }
        };

        let mut accepted = Vec::new();
        for entry in &entries {
            if let Some(item) = self.accept(source, entry).await? {
                accepted.push(item);
            }
        }

        tracing::info!(
            source = %source.name,
            entries = entries.len(),
            accepted = accepted.len(),
            "Found new matching articles"
        );

        Ok(accepted)
    }

    async fn accept(
        &self,
        source: &FeedSource,
        entry: &FeedEntry,
    ) -> Result<Option<Item>, IngestError> {
        let title = TITLE.extract(entry);
        let link = LINK.extract(entry);
        let raw_summary = SUMMARY.extract(entry);
        let published = PUBLISHED.extract(entry);

        let summary = plain_text(raw_summary);
        let matched_keywords = self.matcher.matches(&format!("{} {}", title, summary));
        if matched_keywords.is_empty() {
            return Ok(None);
        }

        let id = ItemId::derive(title, link);
        if self.store.exists(&id).await? {
            tracing::debug!(source = %source.name, id = %id, "Already seen");
            return Ok(None);
        }

        let record = SeenRecord {
            id: id.clone(),
            source: source.name.clone(),
            title: title.to_string(),
            link: link.to_string(),
            published: published.to_string(),
            summary: raw_summary.to_string(),
            first_seen: self.clock.now(),
        };
        self.store.record(&record).await?;

        tracing::debug!(
            source = %source.name,
            id = %id,
            keywords = ?matched_keywords,
            "Accepted article"
        );

        Ok(Some(Item {
            id,
            source: source.name.clone(),
            title: title.to_string(),
            link: link.to_string(),
            summary: truncate_chars(&summary, self.summary_max_chars),
            published: published.to_string(),
            matched_keywords,
        }))
    }
}
