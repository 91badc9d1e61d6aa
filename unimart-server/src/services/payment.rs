//! Order/payment façade over the payment gateway

use std::sync::Arc;

use shared::error::{AppError, ErrorCode};
use shared::models::{
    CreateOrderResponse, OrderProduct, PaymentOrder, VerifyPaymentRequest, VerifyPaymentResponse,
};
use shared::util::now_millis;

use crate::db::{orders, products};
use crate::error::ServiceResult;
use crate::payment::{
    CURRENCY_INR, GatewayOrderRequest, PaymentGateway, amount_in_minor_units, receipt_for,
};
use crate::state::AppState;

fn gateway(state: &AppState) -> ServiceResult<Arc<dyn PaymentGateway>> {
    state
        .gateway
        .clone()
        .ok_or_else(|| ErrorCode::PaymentGatewayNotConfigured.into())
}

pub async fn create_order(
    state: &AppState,
    buyer_id: i64,
    product_id: i64,
) -> ServiceResult<CreateOrderResponse> {
    let gateway = gateway(state)?;

    let product = products::find_by_id(&state.pool, product_id)
        .await?
        .ok_or(ErrorCode::ProductNotFound)?;

    let amount = amount_in_minor_units(product.price)
        .filter(|a| *a > 0)
        .ok_or(ErrorCode::ProductInvalidPrice)?;

    let now = now_millis();
    let request = GatewayOrderRequest {
        amount,
        currency: CURRENCY_INR.to_string(),
        receipt: receipt_for(product.id, now),
    };

    let remote = gateway.create_order(&request).await.map_err(|e| {
        tracing::error!(product_id, error = %e, "Gateway order creation failed");
        AppError::new(ErrorCode::PaymentGatewayError)
    })?;

    let order = PaymentOrder {
        id: remote.id,
        product_id: product.id,
        buyer_id,
        amount: remote.amount,
        currency: remote.currency,
        receipt: remote.receipt.unwrap_or(request.receipt),
        status: remote.status,
        payment_id: None,
        created_at: now,
        updated_at: now,
    };
    orders::create(&state.pool, &order).await?;

    tracing::info!(
        order_id = %order.id,
        product_id,
        buyer_id,
        amount = order.amount,
        "Payment order created"
    );

    Ok(CreateOrderResponse {
        id: order.id,
        amount: order.amount,
        currency: order.currency,
        key_id: gateway.key_id().to_string(),
        product: OrderProduct {
            id: product.id,
            title: product.title,
            price: product.price,
        },
    })
}

pub async fn verify(
    state: &AppState,
    buyer_id: i64,
    req: VerifyPaymentRequest,
) -> ServiceResult<VerifyPaymentResponse> {
    let gateway = gateway(state)?;

    let order_id = req.order_id.trim();
    let payment_id = req.payment_id.trim();
    let signature = req.signature.trim();
    for (field, value) in [
        ("order_id", order_id),
        ("payment_id", payment_id),
        ("signature", signature),
    ] {
        if value.is_empty() {
            return Err(AppError::required(field).into());
        }
    }

    if let Err(e) = gateway.verify_payment_signature(order_id, payment_id, signature) {
        tracing::warn!(order_id, buyer_id, error = %e, "Payment verification failed");
        return Err(ErrorCode::PaymentVerificationFailed.into());
    }

    // Orders belonging to someone else look the same as unknown ones
    let order = orders::find_by_id(&state.pool, order_id)
        .await?
        .filter(|o| o.buyer_id == buyer_id)
        .ok_or(ErrorCode::OrderNotFound)?;

    orders::mark_paid(&state.pool, &order.id, payment_id, now_millis()).await?;

    tracing::info!(order_id, payment_id, buyer_id, "Payment verified");

    Ok(VerifyPaymentResponse {
        success: true,
        message: "Payment verified successfully".to_string(),
    })
}

pub async fn my_orders(state: &AppState, buyer_id: i64) -> ServiceResult<Vec<PaymentOrder>> {
    Ok(orders::find_by_buyer(&state.pool, buyer_id).await?)
}
