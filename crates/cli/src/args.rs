//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// defence-digest: keyword-filtered defence and security news, delivered by email
#[derive(Parser, Debug)]
#[command(name = "defence-digest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch all feeds once, then save and email the digest
    Run(RunArgs),

    /// Run the keyword filter against ad-hoc text
    Match(MatchArgs),

    /// Inspect configured feeds
    Feeds(FeedsArgs),

    /// Send a test message to verify the SMTP settings
    TestEmail,

    /// Configuration management
    Config(ConfigArgs),

    /// Validate configuration and show status
    Doctor(DoctorArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Build and save the digest without sending it or recording anything
    #[arg(long)]
    pub dry_run: bool,

    /// Where to save the rendered digest (overrides general.digest_path)
    #[arg(long)]
    pub digest_path: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct MatchArgs {
    /// Text to match
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// File containing text to match (use - for stdin)
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct FeedsArgs {
    #[command(subcommand)]
    pub command: FeedsCommands,
}

#[derive(Subcommand, Debug)]
pub enum FeedsCommands {
    /// List configured feeds
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./config.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
