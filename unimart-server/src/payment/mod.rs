//! Payment gateway integration
//!
//! The gateway sits behind [`PaymentGateway`] so the HTTP layer never talks
//! to Razorpay directly and tests can swap in a fake.

pub mod razorpay;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

pub use razorpay::RazorpayGateway;

/// Currency of every order
pub const CURRENCY_INR: &str = "INR";

/// Gateway limit on receipt length
pub const MAX_RECEIPT_LEN: usize = 40;

/// Order creation request sent to the gateway
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayOrderRequest {
    /// Minor currency units (paise)
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

/// Order as returned by the gateway
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    pub status: String,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gateway rejected request ({status}): {description}")]
    Api { status: u16, description: String },

    #[error("Invalid payment signature")]
    InvalidSignature,
}

/// Hosted payment gateway
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Public key id handed to the checkout widget
    fn key_id(&self) -> &str;

    async fn create_order(&self, request: &GatewayOrderRequest)
    -> Result<GatewayOrder, GatewayError>;

    /// Check the signature the checkout widget returns after payment
    fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), GatewayError>;
}

type HmacSha256 = Hmac<Sha256>;

fn signature_mac(
    order_id: &str,
    payment_id: &str,
    secret: &str,
) -> Result<HmacSha256, GatewayError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| GatewayError::InvalidSignature)?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Ok(mac)
}

/// Hex HMAC-SHA256 of `order_id|payment_id` under `secret`
pub fn payment_signature(
    order_id: &str,
    payment_id: &str,
    secret: &str,
) -> Result<String, GatewayError> {
    let mac = signature_mac(order_id, payment_id, secret)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time check of a hex payment signature
pub fn verify_signature(
    order_id: &str,
    payment_id: &str,
    signature: &str,
    secret: &str,
) -> Result<(), GatewayError> {
    let sig_bytes = hex::decode(signature.trim()).map_err(|_| GatewayError::InvalidSignature)?;
    signature_mac(order_id, payment_id, secret)?
        .verify_slice(&sig_bytes)
        .map_err(|_| GatewayError::InvalidSignature)
}

/// Price in major units to minor units, rounded half away from zero
pub fn amount_in_minor_units(price: f64) -> Option<i64> {
    let price = Decimal::from_f64(price)?;
    (price * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// `order_{product}_{millis}`, capped at the gateway's receipt length
pub fn receipt_for(product_id: i64, now_millis: i64) -> String {
    let mut receipt = format!("order_{product_id}_{now_millis}");
    receipt.truncate(MAX_RECEIPT_LEN);
    receipt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_round_trip() {
        let sig = payment_signature("order_1", "pay_1", "secret").unwrap();
        assert_eq!(sig.len(), 64);
        assert!(verify_signature("order_1", "pay_1", &sig, "secret").is_ok());
    }

    #[test]
    fn test_signature_mismatch() {
        let sig = payment_signature("order_1", "pay_1", "secret").unwrap();
        assert!(verify_signature("order_1", "pay_2", &sig, "secret").is_err());
        assert!(verify_signature("order_1", "pay_1", &sig, "other").is_err());
        assert!(verify_signature("order_1", "pay_1", "not-hex", "secret").is_err());
    }

    #[test]
    fn test_amount_in_minor_units() {
        assert_eq!(amount_in_minor_units(300.0), Some(30_000));
        assert_eq!(amount_in_minor_units(19.99), Some(1_999));
        assert_eq!(amount_in_minor_units(0.1 + 0.2), Some(30));
        assert_eq!(amount_in_minor_units(f64::NAN), None);
    }

    #[test]
    fn test_receipt_truncated() {
        assert_eq!(receipt_for(10, 1_700_000_000_000), "order_10_1700000000000");
        let long = receipt_for(i64::MAX, i64::MAX);
        assert_eq!(long.len(), MAX_RECEIPT_LEN);
        assert!(long.starts_with("order_9223372036854775807_"));
    }
}
