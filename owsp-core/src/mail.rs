//! Outbound mail transport.
//!
//! [`Mailer`] is the seam the provisioning notifier sends through;
//! [`SmtpMailer`] is the production implementation on top of [`lettre`].

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};

/// Errors that can occur while sending mail.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// Failed to set up the SMTP transport.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Invalid sender or recipient address.
    #[error("invalid email address: {0}")]
    Address(String),

    /// Failed to build or deliver the message.
    #[error("send failed: {0}")]
    Send(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send an HTML mail to a single recipient.
    async fn send(&self, subject: &str, to: &str, html_body: &str) -> Result<(), MailError>;
}

/// SMTP connection settings.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    /// Common values: 25 (unencrypted), 465 (TLS), 587 (STARTTLS).
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
    pub from_name: String,
    /// Use STARTTLS for the connection.
    pub use_tls: bool,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("from_address", &self.from_address)
            .field("from_name", &self.from_name)
            .field("use_tls", &self.use_tls)
            .finish()
    }
}

/// Async SMTP mailer. Each send opens its own SMTP connection.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_mailbox: Mailbox,
}

impl SmtpMailer {
    #[tracing::instrument(
        name = "smtp_mailer_new",
        skip(config),
        fields(host = %config.host, port = %config.port, use_tls = %config.use_tls)
    )]
    pub fn new(config: SmtpConfig) -> Result<Self, MailError> {
        let from_mailbox: Mailbox = format!("{} <{}>", config.from_name, config.from_address)
            .parse()
            .map_err(|e| MailError::Address(format!("{e}")))?;

        let builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| MailError::Connection(format!("{e}")))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };

        let mut builder = builder.port(config.port);

        if let (Some(username), Some(password)) = (config.username, config.password) {
            builder = builder.credentials(Credentials::new(username, password));
        }

        tracing::debug!("SMTP mailer initialized");

        Ok(Self {
            transport: builder.build(),
            from_mailbox,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[tracing::instrument(name = "smtp_send", skip(self, html_body), fields(to = %to, subject = %subject))]
    async fn send(&self, subject: &str, to: &str, html_body: &str) -> Result<(), MailError> {
        let to_mailbox: Mailbox = to
            .parse()
            .map_err(|e| MailError::Address(format!("{e}")))?;

        let message = Message::builder()
            .from(self.from_mailbox.clone())
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| MailError::Send(format!("failed to build message: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Send(format!("{e}")))?;

        tracing::info!("Email sent");
        Ok(())
    }
}
