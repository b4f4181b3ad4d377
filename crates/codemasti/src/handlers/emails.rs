//! Notification and confirmation emails for the submission endpoints.
//!
//! Both sends are best-effort and independent: the admin notification is
//! fire-and-forget with a log line, the user confirmation reports back as
//! the `emailSent` flag. Neither can fail the primary action.

use crate::mailer::EmailMessage;
use crate::state::AppState;

/// Sends the admin notification, logging the outcome.
pub(crate) async fn notify_admin(state: &AppState, subject: &str, html: String) {
    let Some(admin) = state.config.admin_email.clone() else {
        tracing::debug!("No admin email configured, skipping notification");
        return;
    };

    let outcome = state
        .mailer
        .send(EmailMessage {
            to: admin,
            subject: subject.to_string(),
            html,
            from: None,
        })
        .await;

    if !outcome.success {
        tracing::warn!(error = ?outcome.error, "Admin notification failed");
    }
}

/// Sends the user-facing confirmation; the return value becomes `emailSent`.
pub(crate) async fn confirm_user(state: &AppState, to: &str, subject: &str, html: String) -> bool {
    let outcome = state
        .mailer
        .send(EmailMessage {
            to: to.to_string(),
            subject: subject.to_string(),
            html,
            from: None,
        })
        .await;

    if !outcome.success {
        tracing::warn!(to, error = ?outcome.error, "Confirmation email failed");
    }

    outcome.success
}

pub(crate) fn contact_admin_html(name: &str, email: &str, message: &str) -> String {
    format!(
        "<p>New contact enquiry.</p><p><b>{name}</b> &lt;{email}&gt;</p><p>{message}</p>"
    )
}

pub(crate) fn contact_confirm_html(name: &str) -> String {
    format!("<p>Hi {name},</p><p>Thanks for reaching out to CodeMasti. We will get back to you within one working day.</p>")
}

pub(crate) fn newsletter_admin_html(email: &str) -> String {
    format!("<p>New newsletter signup: {email}</p>")
}

pub(crate) fn newsletter_confirm_html() -> String {
    "<p>You are on the CodeMasti newsletter. Expect one update a month, no spam.</p>".to_string()
}

pub(crate) fn registration_admin_html(
    name: &str,
    email: &str,
    batch: &str,
    payment_status: &str,
) -> String {
    let payment = if payment_status.is_empty() {
        "no payment"
    } else {
        payment_status
    };
    format!(
        "<p>New registration.</p><p><b>{name}</b> &lt;{email}&gt;, batch {batch} ({payment})</p>"
    )
}

pub(crate) fn registration_confirm_html(name: &str, batch: &str, payment_status: &str) -> String {
    let payment_line = match payment_status {
        "Paid" => "<p>Your registration fee is confirmed.</p>".to_string(),
        "Pay Later" => {
            "<p>You chose to pay later; we will share payment details before the batch starts.</p>"
                .to_string()
        }
        _ => String::new(),
    };
    format!(
        "<p>Hi {name},</p><p>You are registered for the {batch} batch at CodeMasti.</p>{payment_line}"
    )
}
