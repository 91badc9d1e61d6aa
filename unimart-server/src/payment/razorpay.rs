//! Razorpay REST client (no SDK dependency)

use async_trait::async_trait;
use std::time::Duration;

use super::{GatewayError, GatewayOrder, GatewayOrderRequest, PaymentGateway, verify_signature};

pub const DEFAULT_API_BASE: &str = "https://api.razorpay.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct RazorpayGateway {
    client: reqwest::Client,
    api_base: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayGateway {
    pub fn new(
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
        })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    fn key_id(&self) -> &str {
        &self.key_id
    }

    async fn create_order(
        &self,
        request: &GatewayOrderRequest,
    ) -> Result<GatewayOrder, GatewayError> {
        let resp = self
            .client
            .post(format!("{}/v1/orders", self.api_base))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&serde_json::json!({
                "amount": request.amount,
                "currency": request.currency,
                "receipt": request.receipt,
                "payment_capture": 1,
            }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body: serde_json::Value = resp.json().await.unwrap_or_default();
            let description = body["error"]["description"]
                .as_str()
                .unwrap_or("unknown error")
                .to_string();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                description,
            });
        }

        Ok(resp.json::<GatewayOrder>().await?)
    }

    fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), GatewayError> {
        verify_signature(order_id, payment_id, signature, &self.key_secret)
    }
}
