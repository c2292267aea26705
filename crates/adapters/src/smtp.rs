//! SMTP mail transport (STARTTLS + login) and a recording stub

use async_trait::async_trait;
use defence_digest_domain::{MailError, MailSettings, MailTransport, OutgoingMail};
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use std::sync::Mutex;

/// Sends mail through an authenticated STARTTLS relay
///
/// Every `send` builds its own transport, so no connection outlives the call.
#[derive(Debug, Default)]
pub struct SmtpMailTransport;

impl SmtpMailTransport {
    pub fn new() -> Self {
        Self
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|e: lettre::address::AddressError| MailError::Address {
        address: address.to_string(),
        message: e.to_string(),
    })
}

/// 530/534/535 are the relay's ways of saying the login was refused
fn is_auth_rejection(error: &lettre::transport::smtp::Error) -> bool {
    error
        .status()
        .is_some_and(|code| code.to_string().starts_with("53"))
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, settings: &MailSettings, mail: &OutgoingMail) -> Result<(), MailError> {
        let message = Message::builder()
            .from(parse_mailbox(&mail.from)?)
            .to(parse_mailbox(&mail.to)?)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(mail.html_body.clone())
            .map_err(|e| MailError::Transport(format!("Failed to build message: {}", e)))?;

        let credentials = Credentials::new(
            settings.sender.clone(),
            settings.credential.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(settings.port)
            .credentials(credentials)
            .timeout(Some(settings.timeout))
            .build();

        tracing::debug!(host = %settings.host, port = settings.port, "Opening SMTP session");

        mailer.send(message).await.map_err(|e| {
            if is_auth_rejection(&e) {
                MailError::Auth(e.to_string())
            } else {
                MailError::Transport(e.to_string())
            }
        })?;

        Ok(())
    }
}

/// Stub mail transport for testing
pub struct StubMailTransport {
    enabled: bool,
    sent: Mutex<Vec<OutgoingMail>>,
}

impl StubMailTransport {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            sent: Mutex::new(vec![]),
        }
    }

    /// Get all messages that were sent
    pub fn get_sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl MailTransport for StubMailTransport {
    async fn send(&self, _settings: &MailSettings, mail: &OutgoingMail) -> Result<(), MailError> {
        if !self.enabled {
            return Err(MailError::Transport("Transport disabled".to_string()));
        }

        self.sent
            .lock()
            .map_err(|e| MailError::Transport(e.to_string()))?
            .push(mail.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use std::time::Duration;

    fn settings(port: u16) -> MailSettings {
        MailSettings {
            host: "localhost".to_string(),
            port,
            sender: "bot@example.com".to_string(),
            credential: SecretString::new("app-password".to_string().into()),
            timeout: Duration::from_secs(2),
        }
    }

    fn mail(to: &str) -> OutgoingMail {
        OutgoingMail {
            from: "bot@example.com".to_string(),
            to: to.to_string(),
            subject: "Defence Intelligence Digest - 19 October 2026".to_string(),
            html_body: "<p>No new articles</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_address_error() {
        let transport = SmtpMailTransport::new();

        let err = transport
            .send(&settings(587), &mail("not-an-address"))
            .await
            .unwrap_err();

        match err {
            MailError::Address { address, .. } => assert_eq!(address, "not-an-address"),
            other => panic!("expected address error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_transport_error() {
        // Bind then release a port so nothing is listening on it
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let transport = SmtpMailTransport::new();

        let err = transport
            .send(&settings(port), &mail("analyst@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, MailError::Transport(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_stub_records_messages() {
        let transport = StubMailTransport::new(true);
        transport
            .send(&settings(587), &mail("analyst@example.com"))
            .await
            .unwrap();

        let sent = transport.get_sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "analyst@example.com");
    }

    #[tokio::test]
    async fn test_disabled_stub_fails() {
        let transport = StubMailTransport::new(false);
        let err = transport
            .send(&settings(587), &mail("analyst@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, MailError::Transport(_)));
    }
}
