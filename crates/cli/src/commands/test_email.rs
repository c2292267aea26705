//! Test-email command - verify SMTP settings with a single message

use anyhow::{Context, Result};
use defence_digest_adapters::smtp::SmtpMailTransport;
use defence_digest_domain::{
    RenderedDigest,
    usecases::{DigestPublisher, format_date},
};
use std::path::PathBuf;
use time::OffsetDateTime;

use crate::config::AppConfig;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let settings = config.email.mail_settings();
    let recipient = config.email.recipient().unwrap_or_default();

    println!("SMTP Server:     {}:{}", settings.host, settings.port);
    println!(
        "Sender Email:    {}",
        if settings.sender.is_empty() { "NOT SET" } else { settings.sender.as_str() }
    );
    println!(
        "Sender Password: {}",
        if config.email.password().is_some() { "SET" } else { "NOT SET" }
    );
    println!(
        "Recipient Email: {}",
        if recipient.is_empty() { "NOT SET" } else { recipient.as_str() }
    );
    println!();

    let message = test_message(&settings.sender, &recipient, OffsetDateTime::now_utc());
    let transport = SmtpMailTransport::new();

    DigestPublisher::new(&transport)
        .publish(&message, &recipient, &settings)
        .await
        .context("Test email failed")?;

    println!("Test email sent to {}", recipient);
    println!("(Also check the spam folder if it does not arrive)");

    Ok(())
}

fn test_message(sender: &str, recipient: &str, now: OffsetDateTime) -> RenderedDigest {
    let stamp = format!(
        "{} {:02}:{:02}",
        format_date(now.date()),
        now.hour(),
        now.minute()
    );

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif;">
    <h2 style="color: #2c3e50;">Email Test Successful</h2>
    <p>This is a test email from your defence digest.</p>
    <ul>
        <li>SMTP connection successful</li>
        <li>Authentication successful</li>
        <li>Email delivery successful</li>
    </ul>
    <p style="color: #7f8c8d; font-size: 12px;">
        Sent: {stamp} UTC<br>
        From: {sender}<br>
        To: {recipient}
    </p>
</body>
</html>
"#,
        stamp = stamp,
        sender = html_escape::encode_text(sender),
        recipient = html_escape::encode_text(recipient),
    );

    RenderedDigest {
        subject: format!("Test Email - Defence Digest - {}", stamp),
        html,
        item_count: 0,
        source_count: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_subject_and_escaping() {
        let message = test_message("bot@example.com", "<a@b>", OffsetDateTime::UNIX_EPOCH);

        assert_eq!(message.subject, "Test Email - Defence Digest - 01 January 1970 00:00");
        assert!(message.html.contains("&lt;a@b&gt;"));
        assert!(message.html.contains("bot@example.com"));
    }
}
