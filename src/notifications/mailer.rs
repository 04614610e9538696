//! Mail transport seam. The dispatcher only depends on [`Mailer`], so tests
//! substitute a recording fake and production wires up SMTP.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),
    #[error("failed to build message: {0}")]
    BuildMessage(String),
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Sends one plain-text email.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, text: &str) -> Result<(), TransportError>;
}

/// SMTP mailer over STARTTLS, backed by lettre's async transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(
        host: &str,
        port: u16,
        credentials: Option<(String, String)>,
        from_email: &str,
    ) -> Result<Self, TransportError> {
        let from: Mailbox = from_email
            .parse()
            .map_err(|e: lettre::address::AddressError| {
                TransportError::InvalidAddress(e.to_string())
            })?;
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| TransportError::Delivery(e.to_string()))?
            .port(port);
        if let Some((user, pass)) = credentials {
            builder = builder.credentials(Credentials::new(user, pass));
        }
        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, text: &str) -> Result<(), TransportError> {
        let to: Mailbox = to
            .parse()
            .map_err(|e: lettre::address::AddressError| {
                TransportError::InvalidAddress(e.to_string())
            })?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(text.to_string())
            .map_err(|e| TransportError::BuildMessage(e.to_string()))?;
        self.transport
            .send(message)
            .await
            .map_err(|e| TransportError::Delivery(e.to_string()))?;
        Ok(())
    }
}
