//! Payment API (all routes authenticated)

use axum::{
    Extension, Router,
    extract::State,
    routing::{get, post},
};
use shared::error::AppError;
use shared::models::{
    CreateOrderRequest, CreateOrderResponse, PaymentOrder, VerifyPaymentRequest,
    VerifyPaymentResponse,
};

use crate::api::extract::Json;
use crate::auth::CurrentUser;
use crate::services::payment;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/payment/create-order", post(create_order))
        .route("/payment/verify", post(verify_payment))
        .route("/payment/orders", get(my_orders))
}

async fn create_order(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, AppError> {
    Ok(Json(payment::create_order(&state, user.id, req.product_id).await?))
}

async fn verify_payment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<VerifyPaymentRequest>,
) -> Result<Json<VerifyPaymentResponse>, AppError> {
    Ok(Json(payment::verify(&state, user.id, req).await?))
}

async fn my_orders(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<PaymentOrder>>, AppError> {
    Ok(Json(payment::my_orders(&state, user.id).await?))
}
