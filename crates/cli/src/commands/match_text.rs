//! Match command - run the keyword filter against ad-hoc text

use anyhow::{Context, Result};
use defence_digest_domain::{KeywordMatcher, text::plain_text};
use serde::Serialize;
use std::io::{self, Read};
use std::path::PathBuf;

use crate::args::MatchArgs;
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct MatchOutput {
    matched: bool,
    keywords: Vec<String>,
    keyword_count: usize,
}

pub async fn execute(args: MatchArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let text = get_input_text(&args)?;
    if text.trim().is_empty() {
        anyhow::bail!("No text provided for matching");
    }

    let matcher = KeywordMatcher::new(config.keywords.iter().cloned());
    let keywords = matcher.matches(&plain_text(&text));

    tracing::debug!(
        keyword_count = matcher.len(),
        matched = keywords.len(),
        "Matched text"
    );

    let output = MatchOutput {
        matched: !keywords.is_empty(),
        keywords,
        keyword_count: matcher.len(),
    };

    if args.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialize output")?;
        println!("{}", json);
    } else if output.keywords.is_empty() {
        println!("No keywords matched ({} configured).", output.keyword_count);
    } else {
        println!("Matched {} keywords:", output.keywords.len());
        for keyword in &output.keywords {
            println!("  - {}", keyword);
        }
    }

    Ok(())
}

fn get_input_text(args: &MatchArgs) -> Result<String> {
    if let Some(ref text) = args.text {
        return Ok(text.clone());
    }

    if let Some(ref path) = args.file {
        if path.as_os_str() != "-" {
            return std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()));
        }
    }

    // Default to stdin if no input specified
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read from stdin")?;
    Ok(text)
}
