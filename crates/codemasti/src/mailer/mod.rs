//! Outbound transactional email.
//!
//! One external dispatch per call. Failures are caught and reported as a
//! flag, never thrown to the caller: email failure must not block the
//! primary action (a registration is still recorded even when the
//! confirmation mail fails).

mod deliverability;
mod smtp;

use async_trait::async_trait;

pub use deliverability::is_deliverable;
pub use smtp::SmtpMailer;

/// One outbound email.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    /// Overrides the transport's default sender when set.
    pub from: Option<String>,
}

/// Result of one delivery attempt.
#[derive(Debug, Clone)]
pub struct MailOutcome {
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl MailOutcome {
    pub fn delivered(message_id: Option<String>) -> Self {
        Self {
            success: true,
            message_id,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> MailOutcome;
}

/// Fallback mailer for SMTP-less local runs: logs the message and reports a
/// non-delivery, so `emailSent` flags stay truthful.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: EmailMessage) -> MailOutcome {
        tracing::info!(to = %message.to, subject = %message.subject, "SMTP not configured, logging email instead");
        MailOutcome::failed("SMTP is not configured")
    }
}
