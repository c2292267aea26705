//! Feeds command - inspect configured sources

use anyhow::{Context, Result};
use serde_json::json;
use std::path::PathBuf;

use crate::args::{FeedsArgs, FeedsCommands};
use crate::config::AppConfig;

pub async fn execute(args: FeedsArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    match args.command {
        FeedsCommands::List { json } => list_feeds(&config, json),
    }
}

fn list_feeds(config: &AppConfig, json: bool) -> Result<()> {
    if json {
        let value = json!({
            "feeds": config.feeds,
            "keyword_count": config.keywords.len(),
        });
        let output = serde_json::to_string_pretty(&value).context("Failed to serialize feeds")?;
        println!("{}", output);
        return Ok(());
    }

    println!("Configured feeds ({}):", config.feeds.len());
    for feed in &config.feeds {
        println!("  {:<24} {}", feed.name, feed.url);
    }
    println!();
    println!("Keywords: {}", config.keywords.len());

    Ok(())
}
