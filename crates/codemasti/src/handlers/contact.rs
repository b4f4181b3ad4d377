use axum::{extract::State, Json};
use chrono::Utc;
use codemasti_core::{validate_email, validate_name, validate_phone, SheetRow};
use serde::Deserialize;

use crate::error::ApiError;
use crate::handlers::{emails, SubmissionResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub student_class: String,
    #[serde(default)]
    pub message: String,
}

/// Handle a contact-form submission (POST /api/contact).
pub async fn contact(
    State(state): State<AppState>,
    Json(req): Json<ContactRequest>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    if req.name.is_empty() || req.email.is_empty() || req.message.is_empty() {
        return Err(ApiError::Validation(
            "Name, email and message are required".into(),
        ));
    }

    validate_name(&req.name).map_err(|e| ApiError::Validation(e.into()))?;
    validate_email(&req.email).map_err(|e| ApiError::Validation(e.into()))?;

    // Phone is optional on the contact form, but must be valid when given.
    let phone = if req.phone.is_empty() {
        String::new()
    } else {
        validate_phone(&req.phone).map_err(|e| ApiError::Validation(e.into()))?
    };

    let row = SheetRow::contact(
        Utc::now(),
        &req.name,
        &req.email,
        &phone,
        &req.student_class,
        &req.message,
    );
    state.ledger.append(row).await?;

    emails::notify_admin(
        &state,
        "New contact enquiry",
        emails::contact_admin_html(&req.name, &req.email, &req.message),
    )
    .await;
    let email_sent = emails::confirm_user(
        &state,
        &req.email,
        "We received your message",
        emails::contact_confirm_html(&req.name),
    )
    .await;

    Ok(Json(SubmissionResponse {
        success: true,
        message: "Thanks for reaching out. We will get back to you soon.".into(),
        email_sent,
    }))
}
