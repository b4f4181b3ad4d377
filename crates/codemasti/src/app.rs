use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        contact::contact,
        health::livez,
        newsletter::newsletter,
        pages::{about, index, payment_result, privacy, programs, refund, register_page, terms},
        payments::{config_check, create_payment, finalize_payment, payment_status},
        register::register,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    // API routes with CORS
    let api_routes = Router::new()
        .route("/contact", post(contact))
        .route("/newsletter", post(newsletter))
        .route("/register", post(register))
        .route("/phonepe/create-payment", post(create_payment))
        .route("/phonepe/status", get(payment_status))
        .route("/phonepe/finalize", post(finalize_payment))
        .route("/phonepe/config-check", get(config_check))
        .layer(cors);

    // Main application router
    Router::new()
        .route("/", get(index))
        .route("/about", get(about))
        .route("/programs", get(programs))
        .route("/terms", get(terms))
        .route("/privacy", get(privacy))
        .route("/refund", get(refund))
        .route("/register", get(register_page))
        .route("/payment/result", get(payment_result))
        .route("/livez", get(livez))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use codemasti_core::{OrderState, SubmissionKind};
    use std::sync::Arc;

    use crate::state::test_support::{
        state_with_gateway, state_without_gateway, FailingGateway, FailingMailer,
    };

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn register_payload(email: &str) -> serde_json::Value {
        serde_json::json!({
            "name": "Asha Rao",
            "email": email,
            "phone": "8228907407",
            "studentClass": "8",
            "batch": "spark",
        })
    }

    #[tokio::test]
    async fn test_index_page() {
        let harness = state_with_gateway(OrderState::Pending);
        let app = create_app(harness.state);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("CodeMasti"));
    }

    #[tokio::test]
    async fn test_livez() {
        let harness = state_with_gateway(OrderState::Pending);
        let app = create_app(harness.state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/livez")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_without_payment() {
        let harness = state_with_gateway(OrderState::Pending);
        let app = create_app(harness.state);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/register",
                register_payload("asha@example.com"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["emailSent"], true);

        let rows = harness.ledger.rows().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, SubmissionKind::Registration);
        assert_eq!(rows[0].email, "asha@example.com");
        // No payment fields: stored as empty strings, columns stay aligned.
        assert_eq!(rows[0].payment_ref, "");
        assert_eq!(rows[0].payment_status, "");

        // Admin notification plus user confirmation.
        assert_eq!(harness.mailer.sent.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_conflict() {
        let harness = state_with_gateway(OrderState::Pending);
        let app = create_app(harness.state);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/register",
                register_payload("x@y.com"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Same address in different case must still be a duplicate.
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/register",
                register_payload("X@Y.com"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let json = read_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(harness.ledger.rows().await.len(), 1);
    }

    #[tokio::test]
    async fn test_register_rejects_missing_and_invalid_fields() {
        let harness = state_with_gateway(OrderState::Pending);
        let app = create_app(harness.state);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/register",
                serde_json::json!({ "name": "Asha Rao", "email": "asha@example.com" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let mut bad_phone = register_payload("asha@example.com");
        bad_phone["phone"] = serde_json::json!("5228907407");
        let response = app
            .oneshot(json_request("POST", "/api/register", bad_phone))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert!(harness.ledger.rows().await.is_empty());
    }

    #[tokio::test]
    async fn test_register_email_failure_is_not_fatal() {
        let mut harness = state_with_gateway(OrderState::Pending);
        harness.state.mailer = Arc::new(FailingMailer);
        let app = create_app(harness.state);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/register",
                register_payload("asha@example.com"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["emailSent"], false);

        // The registration is still recorded.
        assert_eq!(harness.ledger.rows().await.len(), 1);
    }

    #[tokio::test]
    async fn test_contact_requires_message() {
        let harness = state_with_gateway(OrderState::Pending);
        let app = create_app(harness.state);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/contact",
                serde_json::json!({ "name": "Asha Rao", "email": "asha@example.com" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(harness.ledger.rows().await.is_empty());
    }

    #[tokio::test]
    async fn test_contact_appends_row() {
        let harness = state_with_gateway(OrderState::Pending);
        let app = create_app(harness.state);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/contact",
                serde_json::json!({
                    "name": "Asha Rao",
                    "email": "asha@example.com",
                    "message": "When does the next batch start?",
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let rows = harness.ledger.rows().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, SubmissionKind::Contact);
        assert_eq!(rows[0].message, "When does the next batch start?");
    }

    #[tokio::test]
    async fn test_newsletter_rejects_invalid_email() {
        let harness = state_with_gateway(OrderState::Pending);
        let app = create_app(harness.state);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/newsletter",
                serde_json::json!({ "email": "a@b" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(harness.ledger.rows().await.is_empty());
    }

    #[tokio::test]
    async fn test_newsletter_appends_row() {
        let harness = state_with_gateway(OrderState::Pending);
        let app = create_app(harness.state);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/newsletter",
                serde_json::json!({ "email": "asha@example.com" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let rows = harness.ledger.rows().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, SubmissionKind::Newsletter);
    }

    #[tokio::test]
    async fn test_create_payment_enforces_minimum_amount() {
        let harness = state_with_gateway(OrderState::Pending);
        let app = create_app(harness.state);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/phonepe/create-payment",
                serde_json::json!({ "amountInPaisa": 50, "redirectPath": "/payment/result" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        assert_eq!(json["error"], "Minimum amount is 100 paisa");
    }

    #[tokio::test]
    async fn test_create_payment_rejects_foreign_origin() {
        let harness = state_with_gateway(OrderState::Pending);
        let app = create_app(harness.state);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/phonepe/create-payment",
                serde_json::json!({
                    "amountInPaisa": 19900,
                    "redirectPath": "/payment/result",
                    "origin": "http://evil.com",
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_payment_returns_session() {
        let harness = state_with_gateway(OrderState::Pending);
        let app = create_app(harness.state);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/phonepe/create-payment",
                serde_json::json!({
                    "amountInPaisa": 19900,
                    "redirectPath": "/payment/result",
                    "orderIdPrefix": "My Batch!",
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;

        assert!(json["redirectUrl"].as_str().unwrap().starts_with("https://"));
        assert_eq!(json["orderId"], "OMO456");
        // Sanitized prefix survives into the merchant order id.
        assert!(json["merchantOrderId"]
            .as_str()
            .unwrap()
            .starts_with("MyBatch_"));
    }

    #[tokio::test]
    async fn test_create_payment_without_gateway_is_config_error() {
        let harness = state_without_gateway();
        let app = create_app(harness.state);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/phonepe/create-payment",
                serde_json::json!({ "amountInPaisa": 19900, "redirectPath": "/payment/result" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_status_requires_merchant_order_id() {
        let harness = state_with_gateway(OrderState::Pending);
        let app = create_app(harness.state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/phonepe/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_status_reports_gateway_state() {
        let harness = state_with_gateway(OrderState::Completed);
        let app = create_app(harness.state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/phonepe/status?merchantOrderId=REG_1_abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["state"], "COMPLETED");
        assert_eq!(json["orderId"], "REG_1_abc");
    }

    #[tokio::test]
    async fn test_finalize_completed_payment_is_at_most_once() {
        let harness = state_with_gateway(OrderState::Completed);
        let app = create_app(harness.state);

        // Suspend a draft behind a payment attempt.
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/phonepe/create-payment",
                serde_json::json!({
                    "amountInPaisa": 19900,
                    "redirectPath": "/payment/result",
                    "draft": register_payload("asha@example.com"),
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let merchant_order_id = read_json(response).await["merchantOrderId"]
            .as_str()
            .unwrap()
            .to_string();

        // First finalize persists exactly one paid registration.
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/phonepe/finalize",
                serde_json::json!({ "merchantOrderId": merchant_order_id }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["state"], "COMPLETED");

        let rows = harness.ledger.rows().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].payment_ref, merchant_order_id);
        assert_eq!(rows[0].payment_status, "Paid");
        let mails_after_first = harness.mailer.sent.lock().await.len();

        // Re-finalizing (refresh, back button) finds no draft: degraded but
        // safe, no duplicate row, no second confirmation email.
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/phonepe/finalize",
                serde_json::json!({ "merchantOrderId": merchant_order_id }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        assert_eq!(harness.ledger.rows().await.len(), 1);
        assert_eq!(harness.mailer.sent.lock().await.len(), mails_after_first);
    }

    #[tokio::test]
    async fn test_finalize_refuses_incomplete_payment() {
        let harness = state_with_gateway(OrderState::Pending);
        let app = create_app(harness.state);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/phonepe/create-payment",
                serde_json::json!({
                    "amountInPaisa": 19900,
                    "redirectPath": "/payment/result",
                    "draft": register_payload("asha@example.com"),
                }),
            ))
            .await
            .unwrap();
        let merchant_order_id = read_json(response).await["merchantOrderId"]
            .as_str()
            .unwrap()
            .to_string();

        // Redirect-back is not proof of payment; a PENDING poll must not
        // persist anything.
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/phonepe/finalize",
                serde_json::json!({ "merchantOrderId": merchant_order_id }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["state"], "PENDING");

        assert!(harness.ledger.rows().await.is_empty());
        assert!(harness.mailer.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_payment_failure_discards_suspended_draft() {
        let mut harness = state_with_gateway(OrderState::Pending);
        harness.state.gateway = Some(Arc::new(FailingGateway));
        let app = create_app(harness.state);

        // Repeated failing attempts must not accumulate suspended drafts.
        for i in 0..5 {
            let response = app
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/api/phonepe/create-payment",
                    serde_json::json!({
                        "amountInPaisa": 19900,
                        "redirectPath": "/payment/result",
                        "draft": register_payload(&format!("asha{i}@example.com")),
                    }),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }

        // No checkout was created, so nothing is left to finalize.
        assert_eq!(harness.pending.len().await, 0);
    }

    #[tokio::test]
    async fn test_config_check_reports_presence_not_values() {
        std::env::set_var("PHONEPE_CLIENT_ID", "test-client-id");
        std::env::set_var("PHONEPE_CLIENT_SECRET", "super-secret-value");

        let harness = state_with_gateway(OrderState::Pending);
        let app = create_app(harness.state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/phonepe/config-check")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(body.to_vec()).unwrap();
        // Presence only, never the credential values themselves.
        assert!(!text.contains("super-secret-value"));
        assert!(!text.contains("test-client-id"));

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["env"], "sandbox");
        assert!(json["authUrl"].as_str().unwrap().starts_with("https://"));
        assert_eq!(json["hint"], "gateway credentials present");
    }

    #[tokio::test]
    async fn test_create_payment_guards_duplicate_draft() {
        let harness = state_with_gateway(OrderState::Completed);
        let app = create_app(harness.state);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/register",
                register_payload("x@y.com"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Duplicate rejected before any payment is created.
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/phonepe/create-payment",
                serde_json::json!({
                    "amountInPaisa": 19900,
                    "redirectPath": "/payment/result",
                    "draft": register_payload("X@Y.com"),
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
