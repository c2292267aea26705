//! Publish use case - delivers a rendered digest by mail

use secrecy::ExposeSecret;

use crate::{
    model::{MailSettings, OutgoingMail, RenderedDigest},
    ports::{MailError, MailTransport},
};

/// Guidance attached to authentication failures
pub const AUTH_GUIDANCE: &str = "Check that the sender password is a valid app password \
(16 characters, spaces removed) and that 2-step verification is enabled for the account";

/// Errors from publishing a digest
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication failed: {message}. {guidance}")]
    Auth {
        message: String,
        guidance: &'static str,
    },
    #[error("Transport error talking to {host}:{port}: {message}")]
    Transport {
        host: String,
        port: u16,
        message: String,
    },
}

/// Check that sender address and credential are present
pub fn validate_mail_settings(settings: &MailSettings) -> Result<(), PublishError> {
    if settings.sender.trim().is_empty() {
        return Err(PublishError::Config("sender address is not set".to_string()));
    }
    if settings.credential.expose_secret().trim().is_empty() {
        return Err(PublishError::Config("sender credential is not set".to_string()));
    }
    Ok(())
}

/// Sends digests through a mail transport
pub struct DigestPublisher<'a, T: MailTransport + ?Sized> {
    transport: &'a T,
}

impl<'a, T: MailTransport + ?Sized> DigestPublisher<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Send `digest` to `recipient`; no network call happens on invalid settings
    pub async fn publish(
        &self,
        digest: &RenderedDigest,
        recipient: &str,
        settings: &MailSettings,
    ) -> Result<(), PublishError> {
        validate_mail_settings(settings)?;
        if recipient.trim().is_empty() {
            return Err(PublishError::Config("recipient address is not set".to_string()));
        }

        tracing::info!(
            host = %settings.host,
            port = settings.port,
            sender = %settings.sender,
            recipient = %recipient,
            "Sending digest"
        );

        let mail = OutgoingMail {
            from: settings.sender.trim().to_string(),
            to: recipient.trim().to_string(),
            subject: digest.subject.clone(),
            html_body: digest.html.clone(),
        };

        self.transport
            .send(settings, &mail)
            .await
            .map_err(|e| match e {
                MailError::Address { .. } => PublishError::Config(e.to_string()),
                MailError::Auth(message) => PublishError::Auth {
                    message,
                    guidance: AUTH_GUIDANCE,
                },
                MailError::Transport(message) => PublishError::Transport {
                    host: settings.host.clone(),
                    port: settings.port,
                    message,
                },
            })?;

        tracing::info!(recipient = %recipient, "Digest sent");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use secrecy::SecretString;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every message; optionally fails with a fixed error
    #[derive(Default)]
    pub(crate) struct FakeTransport {
        pub sent: Mutex<Vec<OutgoingMail>>,
        pub fail_with: Mutex<Option<MailError>>,
    }

    impl FakeTransport {
        pub(crate) fn failing(error: MailError) -> Self {
            Self {
                sent: Mutex::new(vec![]),
                fail_with: Mutex::new(Some(error)),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl MailTransport for FakeTransport {
        async fn send(&self, _settings: &MailSettings, mail: &OutgoingMail) -> Result<(), MailError> {
            self.sent.lock().unwrap().push(mail.clone());
            match self.fail_with.lock().unwrap().take() {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }
    }

    pub(crate) fn settings(sender: &str, credential: &str) -> MailSettings {
        MailSettings {
            host: "smtp.example.com".to_string(),
            port: 587,
            sender: sender.to_string(),
            credential: SecretString::new(credential.to_string().into()),
            timeout: Duration::from_secs(30),
        }
    }

    fn digest() -> RenderedDigest {
        RenderedDigest {
            subject: "Digest".to_string(),
            html: "<p>hi</p>".to_string(),
            item_count: 0,
            source_count: 0,
        }
    }

    #[tokio::test]
    async fn test_publish_sends_one_message() {
        let transport = FakeTransport::default();
        let publisher = DigestPublisher::new(&transport);

        publisher
            .publish(&digest(), "analyst@example.com", &settings("bot@example.com", "secret"))
            .await
            .unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, "bot@example.com");
        assert_eq!(sent[0].to, "analyst@example.com");
        assert_eq!(sent[0].subject, "Digest");
        assert_eq!(sent[0].html_body, "<p>hi</p>");
    }

    #[tokio::test]
    async fn test_publish_empty_credential_is_config_error_without_network() {
        let transport = FakeTransport::default();
        let publisher = DigestPublisher::new(&transport);

        let err = publisher
            .publish(&digest(), "analyst@example.com", &settings("bot@example.com", ""))
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::Config(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_publish_empty_sender_is_config_error_without_network() {
        let transport = FakeTransport::default();
        let publisher = DigestPublisher::new(&transport);

        let err = publisher
            .publish(&digest(), "analyst@example.com", &settings("  ", "secret"))
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::Config(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_publish_maps_auth_failure_with_guidance() {
        let transport = FakeTransport::failing(MailError::Auth("535 5.7.8 rejected".to_string()));
        let publisher = DigestPublisher::new(&transport);

        let err = publisher
            .publish(&digest(), "analyst@example.com", &settings("bot@example.com", "bad"))
            .await
            .unwrap_err();

        match err {
            PublishError::Auth { message, guidance } => {
                assert!(message.contains("535"));
                assert_eq!(guidance, AUTH_GUIDANCE);
            }
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_publish_maps_transport_failure_with_endpoint() {
        let transport = FakeTransport::failing(MailError::Transport("connection refused".to_string()));
        let publisher = DigestPublisher::new(&transport);

        let err = publisher
            .publish(&digest(), "analyst@example.com", &settings("bot@example.com", "pw"))
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::Transport { port: 587, .. }));
        assert!(err.to_string().contains("smtp.example.com:587"));
    }

    #[tokio::test]
    async fn test_publish_bad_address_is_config_error() {
        let transport = FakeTransport::failing(MailError::Address {
            address: "nope".to_string(),
            message: "missing @".to_string(),
        });
        let publisher = DigestPublisher::new(&transport);

        let err = publisher
            .publish(&digest(), "nope", &settings("bot@example.com", "pw"))
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::Config(_)));
    }
}
