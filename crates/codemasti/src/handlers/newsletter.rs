use axum::{extract::State, Json};
use chrono::Utc;
use codemasti_core::{validate_email, SheetRow};
use serde::Deserialize;

use crate::error::ApiError;
use crate::handlers::{emails, SubmissionResponse};
use crate::mailer::is_deliverable;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterRequest {
    #[serde(default)]
    pub email: String,
}

/// Handle a newsletter signup (POST /api/newsletter).
pub async fn newsletter(
    State(state): State<AppState>,
    Json(req): Json<NewsletterRequest>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    if req.email.is_empty() {
        return Err(ApiError::Validation("Email is required".into()));
    }
    validate_email(&req.email).map_err(|e| ApiError::Validation(e.into()))?;

    // Optional deliverability probe; only a confident "undeliverable" rejects.
    if let Some(api_key) = &state.config.mails_so_api_key {
        if is_deliverable(&state.http, api_key, &req.email).await == Some(false) {
            return Err(ApiError::Validation(
                "This email address looks undeliverable".into(),
            ));
        }
    }

    state
        .ledger
        .append(SheetRow::newsletter(Utc::now(), &req.email))
        .await?;

    emails::notify_admin(
        &state,
        "New newsletter signup",
        emails::newsletter_admin_html(&req.email),
    )
    .await;
    let email_sent = emails::confirm_user(
        &state,
        &req.email,
        "Welcome to the CodeMasti newsletter",
        emails::newsletter_confirm_html(),
    )
    .await;

    Ok(Json(SubmissionResponse {
        success: true,
        message: "You are subscribed.".into(),
        email_sent,
    }))
}
