//! Full digest cycles over the adapter implementations

use std::sync::Arc;
use std::time::Duration;

use defence_digest_adapters::artifact::FileDigestSink;
use defence_digest_adapters::feeds::StubFeedFetcher;
use defence_digest_adapters::smtp::StubMailTransport;
use defence_digest_adapters::state::{InMemorySeenStore, SqliteSeenStore};
use defence_digest_domain::usecases::{PublishError, RunLoop, RunLoopConfig, RunLoopError};
use defence_digest_domain::{
    DeliveryGuarantee, FeedEntry, FeedSource, MailSettings, SeenStore, SystemClock,
};
use secrecy::SecretString;
use tempfile::TempDir;

const FEED_URL: &str = "https://feed.example/rss";

fn fetcher() -> StubFeedFetcher {
    StubFeedFetcher::empty().with_feed(
        FEED_URL,
        vec![
            FeedEntry {
                title: Some("MoD awards CACI a new ISR contract".to_string()),
                link: Some("https://news.example/caci".to_string()),
                summary: Some("<p>Five-year deal.</p>".to_string()),
                ..Default::default()
            },
            FeedEntry {
                title: Some("Local bakery wins prize".to_string()),
                link: Some("https://news.example/bakery".to_string()),
                ..Default::default()
            },
        ],
    )
}

fn config(delivery: DeliveryGuarantee) -> RunLoopConfig {
    RunLoopConfig {
        sources: vec![
            FeedSource::new("Defence Wire", FEED_URL),
            FeedSource::new("Offline", "https://offline.example/rss"),
        ],
        keywords: vec!["CACI".into(), "ISR".into()],
        politeness_delay: Duration::ZERO,
        delivery,
        recipient: "analyst@example.com".to_string(),
        mail: MailSettings {
            sender: "bot@example.com".to_string(),
            credential: SecretString::new("app-password".to_string().into()),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn test_sqlite_pipeline_is_idempotent_across_restarts() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("state").join("seen.db");
    let digest_path = dir.path().join("latest_digest.html");

    let transport = Arc::new(StubMailTransport::new(true));
    let sink = Arc::new(FileDigestSink::new(digest_path.clone()));

    let store = Arc::new(SqliteSeenStore::new(&db_path).await.unwrap());
    let first = RunLoop::new(
        Arc::new(fetcher()),
        Arc::clone(&store),
        Arc::clone(&transport),
        Arc::clone(&sink),
        Arc::new(SystemClock),
        config(DeliveryGuarantee::AtMostOnce),
    )
    .run_once()
    .await
    .unwrap();

    assert_eq!(first.items.len(), 1);
    assert_eq!(first.items[0].link, "https://news.example/caci");
    assert!(first.delivered);
    assert_eq!(store.count().await.unwrap(), 1);
    store.close().await;

    let sent = transport.get_sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "analyst@example.com");
    assert!(sent[0].html_body.contains("MoD awards CACI a new ISR contract"));
    assert!(!sent[0].html_body.contains("bakery"));

    let artifact = std::fs::read_to_string(&digest_path).unwrap();
    assert_eq!(artifact, sent[0].html_body);

    // Same feeds after a restart: nothing is new
    let reopened = Arc::new(SqliteSeenStore::new(&db_path).await.unwrap());
    let second = RunLoop::new(
        Arc::new(fetcher()),
        Arc::clone(&reopened),
        Arc::clone(&transport),
        sink,
        Arc::new(SystemClock),
        config(DeliveryGuarantee::AtMostOnce),
    )
    .run_once()
    .await
    .unwrap();

    assert!(second.items.is_empty());
    assert_eq!(second.digest.item_count, 0);
    assert_eq!(reopened.count().await.unwrap(), 1);
    assert_eq!(transport.get_sent().len(), 2);
    reopened.close().await;
}

#[tokio::test]
async fn test_failed_send_keeps_items_unseen_with_at_least_once() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(InMemorySeenStore::new());
    let sink = Arc::new(FileDigestSink::new(dir.path().join("latest_digest.html")));

    let failing = RunLoop::new(
        Arc::new(fetcher()),
        Arc::clone(&store),
        Arc::new(StubMailTransport::new(false)),
        Arc::clone(&sink),
        Arc::new(SystemClock),
        config(DeliveryGuarantee::AtLeastOnce),
    );

    let err = failing.run_once().await.unwrap_err();
    assert!(matches!(
        err,
        RunLoopError::Publish(PublishError::Transport { .. })
    ));
    assert_eq!(store.count().await.unwrap(), 0);

    // The next successful cycle delivers the same item and records it
    let transport = Arc::new(StubMailTransport::new(true));
    let retry = RunLoop::new(
        Arc::new(fetcher()),
        Arc::clone(&store),
        Arc::clone(&transport),
        sink,
        Arc::new(SystemClock),
        config(DeliveryGuarantee::AtLeastOnce),
    )
    .run_once()
    .await
    .unwrap();

    assert_eq!(retry.items.len(), 1);
    assert_eq!(transport.get_sent().len(), 1);
    assert_eq!(store.count().await.unwrap(), 1);
}
