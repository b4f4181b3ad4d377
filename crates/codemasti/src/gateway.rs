//! Payment-gateway seam.
//!
//! Handlers depend on this trait rather than the concrete PhonePe client so
//! tests can substitute a scripted gateway without network access.

use async_trait::async_trait;
use codemasti_phonepe::{OrderStatus, PaymentSession, PhonePeClient};

use crate::error::ApiError;

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted-checkout session for one payment attempt.
    async fn create_payment(
        &self,
        merchant_order_id: &str,
        amount_in_paisa: i64,
        redirect_url: &str,
    ) -> Result<PaymentSession, ApiError>;

    /// Poll the gateway-reported status for a merchant order id.
    async fn order_status(&self, merchant_order_id: &str) -> Result<OrderStatus, ApiError>;
}

#[async_trait]
impl PaymentGateway for PhonePeClient {
    async fn create_payment(
        &self,
        merchant_order_id: &str,
        amount_in_paisa: i64,
        redirect_url: &str,
    ) -> Result<PaymentSession, ApiError> {
        Ok(PhonePeClient::create_payment(self, merchant_order_id, amount_in_paisa, redirect_url)
            .await?)
    }

    async fn order_status(&self, merchant_order_id: &str) -> Result<OrderStatus, ApiError> {
        Ok(PhonePeClient::order_status(self, merchant_order_id).await?)
    }
}
