//! SMTP mailer over lettre's tokio transport.

use async_trait::async_trait;
use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::SmtpConfig;
use crate::error::ApiError;
use crate::mailer::{EmailMessage, MailOutcome, Mailer};

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    default_from: String,
}

impl SmtpMailer {
    /// Build a transport from SMTP configuration.
    ///
    /// `secure` selects implicit TLS (typically port 465); otherwise the
    /// connection upgrades via STARTTLS (typically 587).
    pub fn new(config: &SmtpConfig) -> Result<Self, ApiError> {
        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| ApiError::Config(format!("invalid SMTP relay: {e}")))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(config.user.clone(), config.pass.clone()))
            .build();

        Ok(Self {
            transport,
            default_from: config.from.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: EmailMessage) -> MailOutcome {
        let from = message.from.as_deref().unwrap_or(&self.default_from);

        let from = match from.parse() {
            Ok(mailbox) => mailbox,
            Err(e) => return MailOutcome::failed(format!("invalid sender address: {e}")),
        };
        let to = match message.to.parse() {
            Ok(mailbox) => mailbox,
            Err(e) => return MailOutcome::failed(format!("invalid recipient address: {e}")),
        };

        let email = match Message::builder()
            .from(from)
            .to(to)
            .subject(&message.subject)
            .header(ContentType::TEXT_HTML)
            .body(message.html.clone())
        {
            Ok(email) => email,
            Err(e) => return MailOutcome::failed(format!("failed to build message: {e}")),
        };

        match self.transport.send(email).await {
            Ok(response) => {
                let message_id = response.message().next().map(str::to_string);
                tracing::debug!(to = %message.to, "Email dispatched");
                MailOutcome::delivered(message_id)
            }
            Err(e) => {
                tracing::warn!(to = %message.to, error = %e, "Email dispatch failed");
                MailOutcome::failed(e.to_string())
            }
        }
    }
}
