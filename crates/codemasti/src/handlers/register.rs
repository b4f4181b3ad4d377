use axum::{extract::State, Json};
use chrono::Utc;
use codemasti_core::{RegistrationDraft, SheetRow};
use serde::Deserialize;

use crate::error::ApiError;
use crate::handlers::{emails, SubmissionResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub student_class: String,
    #[serde(default)]
    pub batch: String,
    /// Idempotency key of an already-confirmed payment attempt, when the
    /// client registers after paying.
    #[serde(default)]
    pub payment_merchant_order_id: Option<String>,
    /// Payment status marker, e.g. "Paid" or "Pay Later". Stored verbatim;
    /// empty when the registration carries no payment.
    #[serde(default)]
    pub payment_status: Option<String>,
}

/// Validates the five draft fields and returns the normalized draft.
pub(crate) fn validated_draft(
    name: &str,
    email: &str,
    phone: &str,
    student_class: &str,
    batch: &str,
) -> Result<RegistrationDraft, ApiError> {
    use codemasti_core::{
        validate_batch, validate_email, validate_name, validate_phone, validate_student_class,
    };

    if [name, email, phone, student_class, batch]
        .iter()
        .any(|f| f.is_empty())
    {
        return Err(ApiError::Validation("All fields are required".into()));
    }

    validate_name(name).map_err(|e| ApiError::Validation(e.into()))?;
    validate_email(email).map_err(|e| ApiError::Validation(e.into()))?;
    let phone = validate_phone(phone).map_err(|e| ApiError::Validation(e.into()))?;
    validate_student_class(student_class).map_err(|e| ApiError::Validation(e.into()))?;
    let batch = validate_batch(batch).map_err(|e| ApiError::Validation(e.into()))?;

    Ok(RegistrationDraft {
        name: name.to_string(),
        email: email.to_string(),
        phone,
        student_class: student_class.trim().to_string(),
        batch: batch.as_str().to_string(),
    })
}

/// Appends the registration row and sends the notification/confirmation
/// pair. Shared between the direct register endpoint and payment
/// finalization.
pub(crate) async fn persist_registration(
    state: &AppState,
    draft: &RegistrationDraft,
    payment_ref: &str,
    payment_status: &str,
) -> Result<bool, ApiError> {
    let row = SheetRow::registration(Utc::now(), draft, payment_ref, payment_status);
    state.ledger.append(row).await?;

    emails::notify_admin(
        state,
        "New registration",
        emails::registration_admin_html(&draft.name, &draft.email, &draft.batch, payment_status),
    )
    .await;
    let email_sent = emails::confirm_user(
        state,
        &draft.email,
        "Your CodeMasti registration",
        emails::registration_confirm_html(&draft.name, &draft.batch, payment_status),
    )
    .await;

    Ok(email_sent)
}

/// Handle a registration (POST /api/register).
///
/// Covers the pay-later path and the no-payment path; the duplicate-email
/// guard runs before any email is sent or row appended.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let draft = validated_draft(
        &req.name,
        &req.email,
        &req.phone,
        &req.student_class,
        &req.batch,
    )?;

    if state
        .ledger
        .registration_email_exists(&draft.email)
        .await?
    {
        return Err(ApiError::Conflict("This email is already registered".into()));
    }

    let payment_ref = req.payment_merchant_order_id.unwrap_or_default();
    let payment_status = req.payment_status.unwrap_or_default();

    let email_sent = persist_registration(&state, &draft, &payment_ref, &payment_status).await?;

    tracing::info!(email = %draft.email, batch = %draft.batch, "Registration recorded");

    Ok(Json(SubmissionResponse {
        success: true,
        message: "Registration received.".into(),
        email_sent,
    }))
}
