//! PhonePe checkout API client.

use std::sync::Arc;
use std::time::Duration;

use codemasti_core::OrderState;
use serde::{Deserialize, Serialize};

use crate::config::PhonePeConfig;
use crate::error::PhonePeError;
use crate::token::{Clock, SystemClock, TokenCache};
use crate::Result;

const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(30);

/// A created hosted-checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSession {
    /// Gateway-hosted page the browser must navigate to.
    pub redirect_url: String,
    /// Gateway-side order id.
    pub order_id: String,
    pub state: OrderState,
}

/// Read-only status snapshot fetched from the gateway. Not owned or mutated
/// by this system, only interpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatus {
    pub state: OrderState,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub payable_amount: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub payment_details: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PayRequest<'a> {
    merchant_order_id: &'a str,
    amount: i64,
    payment_flow: PaymentFlow<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentFlow<'a> {
    #[serde(rename = "type")]
    flow_type: &'static str,
    merchant_urls: MerchantUrls<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MerchantUrls<'a> {
    redirect_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_at: u64,
}

/// PhonePe gateway client.
///
/// The only state held across requests is the cached bearer token; creating
/// payments and polling status are otherwise stateless calls against the
/// gateway's REST API.
pub struct PhonePeClient {
    http: reqwest::Client,
    config: PhonePeConfig,
    tokens: TokenCache,
    clock: Arc<dyn Clock>,
}

impl PhonePeClient {
    /// Create a client with the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: PhonePeConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a client with an injected clock (tests drive token expiry
    /// through this seam).
    pub fn with_clock(config: PhonePeConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let http = reqwest::ClientBuilder::new()
            .timeout(OUTBOUND_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            http,
            config,
            tokens: TokenCache::new(),
            clock,
        })
    }

    /// Obtain a bearer token, reusing the cached one while it is outside the
    /// refresh margin. Concurrent refreshes are allowed; the exchange is
    /// side-effect-free on the provider.
    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.tokens.get_fresh(self.clock.as_ref()) {
            return Ok(token);
        }

        tracing::debug!(env = self.config.env_name(), "Exchanging PhonePe client credentials");

        let response = self
            .http
            .post(self.config.auth_url())
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_version", self.config.client_version.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PhonePeError::Token(format!("status {status}: {body}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| PhonePeError::Token(e.to_string()))?;

        self.tokens
            .store(token.access_token.clone(), token.expires_at);

        Ok(token.access_token)
    }

    /// Create a hosted-checkout session for one payment attempt.
    ///
    /// `amount_in_paisa` is always integer paisa, never floating currency;
    /// the API layer enforces the minimum of 100. `redirect_url` must already
    /// be validated and normalized by the caller.
    pub async fn create_payment(
        &self,
        merchant_order_id: &str,
        amount_in_paisa: i64,
        redirect_url: &str,
    ) -> Result<PaymentSession> {
        let token = self.access_token().await?;

        let body = PayRequest {
            merchant_order_id,
            amount: amount_in_paisa,
            payment_flow: PaymentFlow {
                flow_type: "PG_CHECKOUT",
                merchant_urls: MerchantUrls { redirect_url },
            },
        };

        let url = format!("{}/checkout/v2/pay", self.config.base_url());
        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("O-Bearer {token}"))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(gateway_error(response).await);
        }

        let session: PaymentSession = response.json().await?;

        tracing::info!(
            merchant_order_id,
            order_id = %session.order_id,
            state = session.state.as_str(),
            "Created PhonePe checkout session"
        );

        Ok(session)
    }

    /// Fetch the order status for a merchant order id.
    ///
    /// Unknown gateway states pass through opaquely; only the caller decides
    /// what COMPLETED means for registration finalization.
    pub async fn order_status(&self, merchant_order_id: &str) -> Result<OrderStatus> {
        let token = self.access_token().await?;

        let url = format!(
            "{}/checkout/v2/order/{}/status?details=false",
            self.config.base_url(),
            merchant_order_id
        );
        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("O-Bearer {token}"))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(gateway_error(response).await);
        }

        Ok(response.json().await?)
    }
}

/// Extracts the gateway's own message text from a non-2xx response body
/// where available, falling back to the raw body.
async fn gateway_error(response: reqwest::Response) -> PhonePeError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .or_else(|| v.get("code"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or(body);

    PhonePeError::Gateway { status, message }
}
