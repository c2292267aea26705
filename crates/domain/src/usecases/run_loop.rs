//! Run loop use case - one digest cycle over all configured feeds

use std::sync::Arc;
use std::time::Duration;

use crate::{
    matcher::KeywordMatcher,
    model::{DeliveryGuarantee, FeedSource, Item, MailSettings, RenderedDigest},
    ports::{Clock, DigestSink, FeedFetcher, MailTransport, SeenStore},
    usecases::{
        ingest::{DEFAULT_SUMMARY_MAX_CHARS, FeedIngestor},
        publish::{DigestPublisher, PublishError, validate_mail_settings},
        render::{DigestRenderer, RenderConfig},
        staging::StagedSeenStore,
    },
};

/// Configuration for the run loop
#[derive(Debug, Clone)]
pub struct RunLoopConfig {
    /// Feeds to poll, in order
    pub sources: Vec<FeedSource>,
    /// Keyword phrases an item must contain
    pub keywords: Vec<String>,
    /// Maximum summary characters shown per item
    pub summary_max_chars: usize,
    /// Pause between two feed fetches
    pub politeness_delay: Duration,
    /// When accepted items are marked as seen
    pub delivery: DeliveryGuarantee,
    /// Render and write the artifact only; persist and send nothing
    pub dry_run: bool,
    /// Digest recipient
    pub recipient: String,
    /// Mail relay settings
    pub mail: MailSettings,
    /// Render config
    pub render_config: RenderConfig,
}

impl Default for RunLoopConfig {
    fn default() -> Self {
        Self {
            sources: vec![],
            keywords: vec![],
            summary_max_chars: DEFAULT_SUMMARY_MAX_CHARS,
            politeness_delay: Duration::from_secs(1),
            delivery: DeliveryGuarantee::default(),
            dry_run: false,
            recipient: String::new(),
            mail: MailSettings::default(),
            render_config: RenderConfig::default(),
        }
    }
}

/// Outcome of one digest cycle
#[derive(Debug)]
pub struct RunReport {
    /// Items included in the digest
    pub items: Vec<Item>,
    /// Sources whose ingestion aborted on a store error
    pub failed_sources: usize,
    pub digest: RenderedDigest,
    /// Whether the digest was handed to the mail relay
    pub delivered: bool,
}

/// Run loop orchestrator
pub struct RunLoop<F, S, T, K, C>
where
    F: FeedFetcher + ?Sized,
    S: SeenStore + ?Sized,
    T: MailTransport + ?Sized,
    K: DigestSink + ?Sized,
    C: Clock + ?Sized,
{
    fetcher: Arc<F>,
    store: Arc<S>,
    transport: Arc<T>,
    sink: Arc<K>,
    clock: Arc<C>,
    config: RunLoopConfig,
    matcher: KeywordMatcher,
    renderer: DigestRenderer,
}

impl<F, S, T, K, C> RunLoop<F, S, T, K, C>
where
    F: FeedFetcher + ?Sized,
    S: SeenStore + ?Sized,
    T: MailTransport + ?Sized,
    K: DigestSink + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(
        fetcher: Arc<F>,
        store: Arc<S>,
        transport: Arc<T>,
        sink: Arc<K>,
        clock: Arc<C>,
        config: RunLoopConfig,
    ) -> Self {
        let matcher = KeywordMatcher::new(config.keywords.iter().cloned());
        let renderer = DigestRenderer::new(config.render_config.clone());
        Self {
            fetcher,
            store,
            transport,
            sink,
            clock,
            config,
            matcher,
            renderer,
        }
    }

    /// Fetch every source, render the digest, keep a local copy and send it
    pub async fn run_once(&self) -> Result<RunReport, RunLoopError> {
        if !self.config.dry_run {
            // Missing credentials must surface before any feed is touched
            validate_mail_settings(&self.config.mail)?;
        }

        let staged_delivery =
            self.config.dry_run || self.config.delivery == DeliveryGuarantee::AtLeastOnce;
        let staged = StagedSeenStore::new(self.store.as_ref());

        let (items, failed_sources) = if staged_delivery {
            self.collect(&staged).await
        } else {
            self.collect(self.store.as_ref()).await
        };

        let digest = self.renderer.render(&items, self.clock.now().date());

        if let Err(e) = self.sink.write(&digest).await {
            tracing::warn!(error = %e, "Could not save digest file");
        }

        if self.config.dry_run {
            tracing::info!(
                items = digest.item_count,
                sources = digest.source_count,
                "[DRY RUN] Digest not sent, nothing recorded"
            );
            return Ok(RunReport {
                items,
                failed_sources,
                digest,
                delivered: false,
            });
        }

        DigestPublisher::new(self.transport.as_ref())
            .publish(&digest, &self.config.recipient, &self.config.mail)
            .await?;

        if staged_delivery {
            match staged.commit().await {
                Ok(count) => tracing::info!(count, "Recorded delivered articles as seen"),
                Err(e) => {
                    tracing::error!(error = %e, "Digest sent but articles could not be recorded")
                }
            }
        }

        Ok(RunReport {
            items,
            failed_sources,
            digest,
            delivered: true,
        })
    }

    /// Ingest all sources in order against `store`
    async fn collect<St: SeenStore + ?Sized>(&self, store: &St) -> (Vec<Item>, usize) {
        let ingestor = FeedIngestor::new(
            self.fetcher.as_ref(),
            store,
            self.clock.as_ref(),
            &self.matcher,
        )
        .with_summary_max_chars(self.config.summary_max_chars);

        let mut items = Vec::new();
        let mut failed_sources = 0;

        for (index, source) in self.config.sources.iter().enumerate() {
            if index > 0 && !self.config.politeness_delay.is_zero() {
                tokio::time::sleep(self.config.politeness_delay).await;
            }

            match ingestor.ingest(source).await {
                Ok(accepted) => items.extend(accepted),
                Err(e) => {
                    tracing::error!(source = %source.name, error = %e, "Failed to ingest source");
                    // Continue with other sources
                    failed_sources += 1;
                }
            }
        }

        tracing::info!(
            total = items.len(),
            sources = self.config.sources.len(),
            failed_sources,
            "Total new articles found"
        );

        (items, failed_sources)
    }
}

/// Errors from the run loop
#[derive(Debug, thiserror::Error)]
pub enum RunLoopError {
    #[error(transparent)]
    Publish(#[from] PublishError),
}
