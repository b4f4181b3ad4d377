//! Optional deliverability probe against mails.so.
//!
//! Best effort only: any transport or parse failure yields `None`, and the
//! caller treats that as "no signal" rather than rejecting the address.

use serde::Deserialize;

const VALIDATE_URL: &str = "https://api.mails.so/v1/validate";

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    data: ValidateData,
}

#[derive(Debug, Deserialize)]
struct ValidateData {
    result: String,
}

/// Returns `Some(false)` only when the provider is confident the address is
/// undeliverable; `Some(true)` when it is deliverable; `None` on risky or
/// unknown verdicts and on any probe failure.
pub async fn is_deliverable(http: &reqwest::Client, api_key: &str, email: &str) -> Option<bool> {
    let response = http
        .get(VALIDATE_URL)
        .query(&[("email", email)])
        .header("x-mails-api-key", api_key)
        .send()
        .await
        .ok()?;

    if !response.status().is_success() {
        tracing::debug!(status = %response.status(), "Deliverability probe failed");
        return None;
    }

    let verdict: ValidateResponse = response.json().await.ok()?;

    match verdict.data.result.as_str() {
        "deliverable" => Some(true),
        "undeliverable" => Some(false),
        _ => None,
    }
}
