//! Payment Order Model (local shadow of a gateway order)

use serde::{Deserialize, Serialize};

/// Status after a verified payment
pub const ORDER_STATUS_PAID: &str = "paid";

/// Shadow record of a remote gateway order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrder {
    /// Gateway-assigned order id
    pub id: String,
    pub product_id: i64,
    pub buyer_id: i64,
    /// Amount in minor currency units
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    /// Mirrors the gateway status ("created"), then "paid" once verified
    pub status: String,
    pub payment_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(
        rename = "productId",
        alias = "product_id",
        deserialize_with = "crate::util::deserialize_id"
    )]
    pub product_id: i64,
}

/// Product snapshot returned with a created order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderProduct {
    pub id: i64,
    pub title: String,
    pub price: f64,
}

/// Response for POST /api/payment/create-order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    /// Public key id for the checkout widget
    pub key_id: String,
    pub product: OrderProduct,
}

/// Verify payload, as handed back by the checkout widget
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    #[serde(default, alias = "razorpay_order_id", alias = "order_id")]
    pub order_id: String,
    #[serde(default, alias = "razorpay_payment_id", alias = "payment_id")]
    pub payment_id: String,
    #[serde(default, alias = "razorpay_signature")]
    pub signature: String,
}

/// Response for POST /api/payment/verify
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
}
