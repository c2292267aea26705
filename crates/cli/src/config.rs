//! Configuration loading and management

use anyhow::{Context, Result};
use defence_digest_domain::{
    DeliveryGuarantee, FeedSource, MailSettings, usecases::RenderConfig,
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::defaults::{DEFAULT_FEEDS, DEFAULT_KEYWORDS};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub email: EmailConfig,

    #[serde(default)]
    pub digest: DigestConfig,

    #[serde(default = "default_feeds")]
    pub feeds: Vec<FeedSource>,

    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_state_db_path")]
    pub state_db_path: PathBuf,

    #[serde(default = "default_digest_path")]
    pub digest_path: PathBuf,

    #[serde(default = "default_politeness_delay_ms")]
    pub politeness_delay_ms: u64,

    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    #[serde(default = "default_summary_max_chars")]
    pub summary_max_chars: usize,

    #[serde(default)]
    pub delivery: DeliveryGuarantee,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "default_smtp_server")]
    pub smtp_server: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default = "default_smtp_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_sender_email_env")]
    pub sender_email_env: String,

    #[serde(default = "default_sender_password_env")]
    pub sender_password_env: String,

    #[serde(default = "default_recipient_email_env")]
    pub recipient_email_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestConfig {
    #[serde(default = "default_digest_title")]
    pub title: String,

    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,

    #[serde(default = "default_max_keywords_shown")]
    pub max_keywords_shown: usize,
}

// Default value functions
fn default_state_db_path() -> PathBuf {
    PathBuf::from("./defence_news.db")
}

fn default_digest_path() -> PathBuf {
    PathBuf::from("./latest_digest.html")
}

fn default_politeness_delay_ms() -> u64 {
    1000
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_summary_max_chars() -> usize {
    300
}

fn default_smtp_server() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_timeout() -> u64 {
    30
}

fn default_sender_email_env() -> String {
    "SENDER_EMAIL".to_string()
}

fn default_sender_password_env() -> String {
    "SENDER_PASSWORD".to_string()
}

fn default_recipient_email_env() -> String {
    "RECIPIENT_EMAIL".to_string()
}

fn default_digest_title() -> String {
    RenderConfig::default().title
}

fn default_subject_prefix() -> String {
    RenderConfig::default().subject_prefix
}

fn default_max_keywords_shown() -> usize {
    RenderConfig::default().max_keywords_shown
}

fn default_feeds() -> Vec<FeedSource> {
    DEFAULT_FEEDS
        .iter()
        .map(|(name, url)| FeedSource::new(*name, *url))
        .collect()
}

fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            email: EmailConfig::default(),
            digest: DigestConfig::default(),
            feeds: default_feeds(),
            keywords: default_keywords(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            state_db_path: default_state_db_path(),
            digest_path: default_digest_path(),
            politeness_delay_ms: default_politeness_delay_ms(),
            fetch_timeout_secs: default_fetch_timeout(),
            summary_max_chars: default_summary_max_chars(),
            delivery: DeliveryGuarantee::default(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_server: default_smtp_server(),
            smtp_port: default_smtp_port(),
            timeout_secs: default_smtp_timeout(),
            sender_email_env: default_sender_email_env(),
            sender_password_env: default_sender_password_env(),
            recipient_email_env: default_recipient_email_env(),
        }
    }
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            title: default_digest_title(),
            subject_prefix: default_subject_prefix(),
            max_keywords_shown: default_max_keywords_shown(),
        }
    }
}

impl GeneralConfig {
    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl EmailConfig {
    /// Sender address from the configured env var
    pub fn sender(&self) -> Option<String> {
        read_env(&self.sender_email_env)
    }

    /// Sender password from the configured env var, spaces removed
    pub fn password(&self) -> Option<SecretString> {
        read_env(&self.sender_password_env)
            .map(|raw| normalize_app_password(&raw))
            .filter(|password| !password.is_empty())
            .map(|password| SecretString::new(password.into()))
    }

    /// Recipient address; falls back to the sender when unset
    pub fn recipient(&self) -> Option<String> {
        read_env(&self.recipient_email_env).or_else(|| self.sender())
    }

    /// Relay settings with whatever credentials the environment provides
    ///
    /// Missing values stay empty so the publisher reports them as a
    /// configuration error.
    pub fn mail_settings(&self) -> MailSettings {
        MailSettings {
            host: self.smtp_server.trim().to_string(),
            port: self.smtp_port,
            sender: self.sender().unwrap_or_default(),
            credential: self
                .password()
                .unwrap_or_else(|| SecretString::new(String::new().into())),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl DigestConfig {
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            title: self.title.clone(),
            subject_prefix: self.subject_prefix.clone(),
            max_keywords_shown: self.max_keywords_shown,
        }
    }
}

fn read_env(name: &str) -> Option<String> {
    if name.trim().is_empty() {
        return None;
    }

    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// App passwords are usually shown in space-separated groups of four
pub fn normalize_app_password(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != ' ' && *c != '\u{a0}')
        .collect::<String>()
        .trim()
        .to_string()
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("DEFENCE_DIGEST")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# defence-digest configuration

[general]
state_db_path = "./defence_news.db"
digest_path = "./latest_digest.html"
# Pause between two feed fetches
politeness_delay_ms = 1000
fetch_timeout_secs = 30
summary_max_chars = 300
# at_most_once: articles count as seen once fetched, even if the email fails
# at_least_once: articles count as seen only after the email was sent
delivery = "at_most_once"

[email]
smtp_server = "smtp.gmail.com"
smtp_port = 587
timeout_secs = 30
# Names of the environment variables holding the credentials
sender_email_env = "SENDER_EMAIL"
sender_password_env = "SENDER_PASSWORD"
# Falls back to the sender address when unset
recipient_email_env = "RECIPIENT_EMAIL"

[digest]
title = "Defence & Security Intelligence Digest"
subject_prefix = "Defence Intelligence Digest"
max_keywords_shown = 5

# Without a `keywords` list or `[[feeds]]` entries the built-in defence
# and security lists are used. Defining either replaces the built-in list.
#
# keywords = ["ISR", "electronic warfare", "contract award"]
#
# [[feeds]]
# name = "Defense News"
# url = "https://www.defensenews.com/arc/outboundfeeds/rss/"
"#
        .to_string()
    }
}
