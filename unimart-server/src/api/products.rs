//! Product API
//!
//! - `GET /api/products`: public catalog search
//! - `GET /api/products/{id}`: public detail
//! - `POST /api/products`: create listing (multipart, auth)
//! - `GET /api/products/seller`: caller's own listings (auth)

use axum::{
    Extension, Router,
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    routing::get,
};
use shared::error::{AppError, ErrorCode};
use shared::models::{Product, ProductDetail, ProductListing};

use crate::api::extract::{Json, Multipart, Query};
use crate::auth::CurrentUser;
use crate::catalog::ProductQuery;
use crate::services::listing::{self, ListingForm};
use crate::services::upload::{ImageUpload, MAX_FILE_SIZE};
use crate::state::AppState;

/// Image plus the text fields of the form
const MAX_LISTING_BODY: usize = MAX_FILE_SIZE + 2 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(list_products)
                .post(create_product)
                .layer(DefaultBodyLimit::max(MAX_LISTING_BODY)),
        )
        .route("/products/seller", get(seller_products))
        .route("/products/{id}", get(get_product))
}

async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<ProductListing>>, AppError> {
    Ok(Json(listing::search(&state, &query).await?))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDetail>, AppError> {
    // Malformed ids cannot name a product
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(Json(listing::detail(&state, id).await?))
}

async fn seller_products(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<ProductListing>>, AppError> {
    Ok(Json(listing::seller_listings(&state, user.id).await?))
}

fn multipart_error(e: impl std::fmt::Display) -> AppError {
    AppError::invalid_request(format!("Multipart error: {e}"))
}

async fn create_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Multipart(mut multipart): Multipart,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let mut form = ListingForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        // A file part named "image" is the upload; a text part is a URL
        if name == "image" && field.file_name().is_some() {
            let file_name = field.file_name().map(String::from);
            let data = field.bytes().await.map_err(multipart_error)?;
            if !data.is_empty() {
                form.image_file = Some(ImageUpload {
                    file_name,
                    data: data.to_vec(),
                });
            }
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;
        form.set_field(&name, value);
    }

    let product = listing::create(&state, &user, form).await?;
    Ok((StatusCode::CREATED, Json(product)))
}
