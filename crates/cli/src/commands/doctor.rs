//! Doctor command - validate configuration and show status

use anyhow::Result;
use defence_digest_adapters::state::SqliteSeenStore;
use defence_digest_domain::SeenStore;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;

use crate::args::DoctorArgs;
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    feeds: CheckResult,
    keywords: CheckResult,
    state: CheckResult,
    email: CheckResult,
    overall: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
    details: Option<serde_json::Value>,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: "warn".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn is_error(&self) -> bool {
        self.status == "error"
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        feeds: CheckResult::error("Not checked"),
        keywords: CheckResult::error("Not checked"),
        state: CheckResult::error("Not checked"),
        email: CheckResult::error("Not checked"),
        overall: "error".to_string(),
    };

    // Check config
    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(c) => {
            report.config = CheckResult::ok("Configuration loaded successfully");
            Some(c)
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {:#}", e));
            None
        }
    };

    if let Some(ref config) = config {
        report.feeds = check_feeds(config);
        report.keywords = check_keywords(config);
        report.state = check_state(&config.general.state_db_path).await;
        report.email = check_email(config);
    }

    // Determine overall status
    let checks = [
        &report.config,
        &report.feeds,
        &report.keywords,
        &report.state,
        &report.email,
    ];

    let has_error = checks.iter().any(|c| c.is_error());
    let all_ok = checks.iter().all(|c| c.is_ok());

    report.overall = if has_error {
        "error".to_string()
    } else if all_ok {
        "ok".to_string()
    } else {
        "warn".to_string()
    };

    // Output report
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.overall == "error" {
        std::process::exit(1);
    }

    Ok(())
}

fn check_feeds(config: &AppConfig) -> CheckResult {
    if config.feeds.is_empty() {
        return CheckResult::error("No feeds configured");
    }

    let invalid: Vec<_> = config
        .feeds
        .iter()
        .filter(|f| {
            f.name.trim().is_empty()
                || !(f.url.starts_with("http://") || f.url.starts_with("https://"))
        })
        .map(|f| f.name.clone())
        .collect();

    if !invalid.is_empty() {
        return CheckResult::error(format!(
            "{} feeds have an empty name or a non-HTTP URL",
            invalid.len()
        ))
        .with_details(serde_json::json!({ "invalid": invalid }));
    }

    CheckResult::ok(format!("{} feeds configured", config.feeds.len())).with_details(
        serde_json::json!({
            "names": config.feeds.iter().map(|f| &f.name).collect::<Vec<_>>()
        }),
    )
}

fn check_keywords(config: &AppConfig) -> CheckResult {
    let blank = config.keywords.iter().filter(|k| k.trim().is_empty()).count();
    let usable = config.keywords.len() - blank;

    if usable == 0 {
        return CheckResult::error("No keywords configured; every article would be dropped");
    }

    if blank > 0 {
        return CheckResult::warn(format!(
            "{} keywords, {} blank entries are ignored",
            usable, blank
        ));
    }

    CheckResult::ok(format!("{} keywords", usable))
}

async fn check_state(path: &Path) -> CheckResult {
    if !path.exists() {
        return CheckResult::warn(format!(
            "Seen-item database {} does not exist yet; it is created on the first run",
            path.display()
        ));
    }

    let store = match SqliteSeenStore::new(path).await {
        Ok(s) => s,
        Err(e) => return CheckResult::error(format!("Failed to open seen-item database: {}", e)),
    };

    let result = match store.count().await {
        Ok(count) => CheckResult::ok(format!(
            "Seen-item database {}: {} articles recorded",
            path.display(),
            count
        ))
        .with_details(serde_json::json!({ "count": count })),
        Err(e) => CheckResult::error(format!("Failed to query seen-item database: {}", e)),
    };

    store.close().await;
    result
}

fn check_email(config: &AppConfig) -> CheckResult {
    let email = &config.email;
    let endpoint = format!("{}:{}", email.smtp_server, email.smtp_port);

    if email.smtp_server.trim().is_empty() {
        return CheckResult::error("No SMTP server configured");
    }

    let sender = email.sender();
    let password_set = email.password().is_some();

    let recipient = match (email.recipient(), &sender) {
        (Some(r), Some(s)) if &r == s => format!("{} (sender)", r),
        (Some(r), _) => r,
        (None, _) => "NOT SET".to_string(),
    };

    // Never include the password itself
    let password_status = if password_set { "SET" } else { "NOT SET" };
    let details = serde_json::json!({
        "server": endpoint,
        "sender": sender.as_deref().unwrap_or("NOT SET"),
        "password": password_status,
        "recipient": recipient,
    });

    match sender {
        Some(sender) if password_set => CheckResult::ok(format!(
            "Server: {}, Sender: {}, Password: {} (set), Recipient: {}",
            endpoint, sender, email.sender_password_env, recipient
        ))
        .with_details(details),
        Some(_) => CheckResult::error(format!(
            "Server: {}, Password: {} (not set)",
            endpoint, email.sender_password_env
        ))
        .with_details(details),
        None => CheckResult::error(format!(
            "Server: {}, Sender: {} (not set)",
            endpoint, email.sender_email_env
        ))
        .with_details(details),
    }
}

fn print_report(report: &DoctorReport) {
    println!("defence-digest Doctor Report");
    println!("============================");
    println!();

    print_check("Config", &report.config);
    print_check("Feeds", &report.feeds);
    print_check("Keywords", &report.keywords);
    print_check("State", &report.state);
    print_check("Email", &report.email);

    println!();
    let symbol = match report.overall.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} Overall: {}", symbol, report.overall.to_uppercase());

    if report.overall != "error" {
        println!();
        println!("Ready to run! Try: defence-digest run --dry-run");
    }
}

fn print_check(name: &str, result: &CheckResult) {
    let symbol = match result.status.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} {}: {}", symbol, name, result.message);
}
