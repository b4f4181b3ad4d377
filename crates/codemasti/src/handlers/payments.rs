//! Payment endpoints: the client-driven registration/payment handshake.
//!
//! The flow is sequential against the gateway: create a hosted-checkout
//! session (INITIATED), let the browser redirect out and back
//! (AWAITING_RETURN), then poll status and finalize. The browser's belief
//! that it returned from the gateway is never trusted; only a COMPLETED
//! status fetched here lets a registration persist as paid.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use codemasti_core::{
    generate_merchant_order_id, normalize_redirect_url, OrderState, RegistrationDraft,
};
use codemasti_phonepe::{auth_url_for, env_name_for, sandbox_from_env, OrderStatus};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::gateway::PaymentGateway;
use crate::handlers::register::{persist_registration, validated_draft};
use crate::state::AppState;

/// Minimum chargeable amount: 100 paisa, i.e. one rupee.
const MIN_AMOUNT_IN_PAISA: i64 = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    #[serde(default)]
    pub amount_in_paisa: i64,
    #[serde(default)]
    pub redirect_path: String,
    /// Base origin for the redirect-back URL; defaults to the configured
    /// site URL. Validated against the https/localhost allow-list.
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub order_id_prefix: Option<String>,
    /// Registration draft to suspend while the browser is on the gateway's
    /// page; resumed by the finalize endpoint.
    #[serde(default)]
    pub draft: Option<RegistrationDraft>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentResponse {
    pub redirect_url: String,
    pub merchant_order_id: String,
    pub order_id: String,
    pub state: OrderState,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    #[serde(default)]
    pub merchant_order_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeRequest {
    #[serde(default)]
    pub merchant_order_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeResponse {
    pub success: bool,
    pub state: OrderState,
    pub message: String,
    pub email_sent: bool,
}

fn required_gateway(state: &AppState) -> Result<Arc<dyn PaymentGateway>, ApiError> {
    state
        .gateway
        .clone()
        .ok_or_else(|| ApiError::Config("payment gateway is not configured".into()))
}

/// Create a hosted-checkout session (POST /api/phonepe/create-payment).
pub async fn create_payment(
    State(state): State<AppState>,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<Json<CreatePaymentResponse>, ApiError> {
    if req.amount_in_paisa < MIN_AMOUNT_IN_PAISA {
        return Err(ApiError::Validation("Minimum amount is 100 paisa".into()));
    }
    if req.redirect_path.is_empty() {
        return Err(ApiError::Validation("redirectPath is required".into()));
    }

    let gateway = required_gateway(&state)?;

    let origin = req.origin.unwrap_or_else(|| state.config.app_url.clone());
    let prefix = req.order_id_prefix.as_deref().unwrap_or("REG");
    let merchant_order_id = generate_merchant_order_id(prefix);

    let redirect_url = normalize_redirect_url(&origin, &req.redirect_path, &merchant_order_id)
        .ok_or_else(|| ApiError::Validation("Redirect origin is not allowed".into()))?;

    // Validate and suspend the draft before any money moves, so a paid
    // attempt can never finalize into a duplicate or invalid registration.
    if let Some(draft) = req.draft {
        let draft = validated_draft(
            &draft.name,
            &draft.email,
            &draft.phone,
            &draft.student_class,
            &draft.batch,
        )?;

        if state
            .ledger
            .registration_email_exists(&draft.email)
            .await?
        {
            return Err(ApiError::Conflict("This email is already registered".into()));
        }

        state.pending.put(merchant_order_id.clone(), draft).await;
    }

    let session = match gateway
        .create_payment(&merchant_order_id, req.amount_in_paisa, &redirect_url)
        .await
    {
        Ok(session) => session,
        Err(err) => {
            // No checkout exists, so nothing can ever finalize this draft.
            state.pending.take(&merchant_order_id).await;
            return Err(err);
        }
    };

    Ok(Json(CreatePaymentResponse {
        redirect_url: session.redirect_url,
        merchant_order_id,
        order_id: session.order_id,
        state: session.state,
    }))
}

/// Poll order status (GET /api/phonepe/status?merchantOrderId=).
pub async fn payment_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<OrderStatus>, ApiError> {
    let merchant_order_id = query
        .merchant_order_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Validation("merchantOrderId is required".into()))?;

    let gateway = required_gateway(&state)?;
    let status = gateway.order_status(&merchant_order_id).await?;

    Ok(Json(status))
}

/// Finalize a paid registration (POST /api/phonepe/finalize).
///
/// Safe to invoke more than once for the same merchant order id: the first
/// call takes the pending draft, so a reloaded result page finds nothing to
/// resubmit and gets the explicit contact-support terminal instead of a
/// duplicate row or a second confirmation email.
pub async fn finalize_payment(
    State(state): State<AppState>,
    Json(req): Json<FinalizeRequest>,
) -> Result<Json<FinalizeResponse>, ApiError> {
    if req.merchant_order_id.is_empty() {
        return Err(ApiError::Validation("merchantOrderId is required".into()));
    }

    let gateway = required_gateway(&state)?;
    let status = gateway.order_status(&req.merchant_order_id).await?;

    if !status.state.is_completed() {
        tracing::info!(
            merchant_order_id = %req.merchant_order_id,
            state = status.state.as_str(),
            "Finalize requested before payment completion"
        );
        return Ok(Json(FinalizeResponse {
            success: false,
            state: status.state,
            message: "Payment is not completed".into(),
            email_sent: false,
        }));
    }

    let draft = state
        .pending
        .take(&req.merchant_order_id)
        .await
        .ok_or_else(|| {
            ApiError::NotFound(
                "Payment succeeded, but we could not find your registration. Please contact support."
                    .into(),
            )
        })?;

    let email_sent =
        persist_registration(&state, &draft, &req.merchant_order_id, "Paid").await?;

    tracing::info!(
        merchant_order_id = %req.merchant_order_id,
        email = %draft.email,
        "Paid registration finalized"
    );

    Ok(Json(FinalizeResponse {
        success: true,
        state: OrderState::Completed,
        message: "Registration confirmed.".into(),
        email_sent,
    }))
}

/// Gateway configuration diagnostic (GET /api/phonepe/config-check).
///
/// Reports presence of credentials and the resolved endpoints; never the
/// secret values themselves.
pub async fn config_check() -> Json<serde_json::Value> {
    let has = |name: &str| std::env::var(name).map(|v| !v.is_empty()).unwrap_or(false);

    let have_id = has("PHONEPE_CLIENT_ID");
    let have_secret = has("PHONEPE_CLIENT_SECRET");
    let sandbox = sandbox_from_env();

    let ok = have_id && have_secret;
    let hint = if ok {
        "gateway credentials present".to_string()
    } else {
        let mut missing = Vec::new();
        if !have_id {
            missing.push("PHONEPE_CLIENT_ID");
        }
        if !have_secret {
            missing.push("PHONEPE_CLIENT_SECRET");
        }
        format!("set {}", missing.join(" and "))
    };

    Json(serde_json::json!({
        "ok": ok,
        "env": env_name_for(sandbox),
        "authUrl": auth_url_for(sandbox),
        "hint": hint,
    }))
}
