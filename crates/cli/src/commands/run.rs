//! Run command - fetch, filter, render, save and send one digest

use anyhow::{Context, Result};
use defence_digest_adapters::{
    artifact::FileDigestSink, feeds::HttpFeedFetcher, smtp::SmtpMailTransport,
    state::SqliteSeenStore,
};
use defence_digest_domain::{
    SystemClock,
    usecases::{RunLoop, RunLoopConfig},
};
use std::path::PathBuf;
use std::sync::Arc;

use crate::args::RunArgs;
use crate::config::AppConfig;

pub async fn execute(args: RunArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let digest_path = args
        .digest_path
        .clone()
        .unwrap_or_else(|| config.general.digest_path.clone());

    let mail = config.email.mail_settings();
    let recipient = config.email.recipient().unwrap_or_default();
    let sender_display = if mail.sender.is_empty() {
        "NOT SET"
    } else {
        mail.sender.as_str()
    };

    tracing::info!(
        dry_run = args.dry_run,
        feeds = config.feeds.len(),
        keywords = config.keywords.len(),
        delivery = ?config.general.delivery,
        smtp_server = %mail.host,
        smtp_port = mail.port,
        sender = %sender_display,
        recipient = %recipient,
        "Starting defence-digest run"
    );

    // Build dependencies
    let fetcher = Arc::new(
        HttpFeedFetcher::new(config.general.fetch_timeout())
            .context("Failed to initialize feed fetcher")?,
    );

    let store = Arc::new(
        SqliteSeenStore::new(&config.general.state_db_path)
            .await
            .context("Failed to initialize SQLite seen-item store")?,
    );

    let transport = Arc::new(SmtpMailTransport::new());
    let sink = Arc::new(FileDigestSink::new(digest_path));
    let clock = Arc::new(SystemClock);

    let loop_config = RunLoopConfig {
        sources: config.feeds.clone(),
        keywords: config.keywords.clone(),
        summary_max_chars: config.general.summary_max_chars,
        politeness_delay: config.general.politeness_delay(),
        delivery: config.general.delivery,
        dry_run: args.dry_run,
        recipient,
        mail,
        render_config: config.digest.render_config(),
    };

    let run_loop = RunLoop::new(
        fetcher,
        Arc::clone(&store),
        transport,
        sink,
        clock,
        loop_config,
    );

    let result = run_loop.run_once().await;
    store.close().await;
    let report = result.context("Digest run failed")?;

    tracing::info!(
        items = report.items.len(),
        sources = report.digest.source_count,
        failed_sources = report.failed_sources,
        delivered = report.delivered,
        "Run complete"
    );

    if args.dry_run {
        println!(
            "[DRY RUN] {} new articles across {} sources (not sent)",
            report.digest.item_count, report.digest.source_count
        );
    } else {
        println!(
            "Digest sent: {} new articles across {} sources",
            report.digest.item_count, report.digest.source_count
        );
    }

    Ok(())
}
