//! Product listings: catalog search, detail view and listing creation

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    DEFAULT_LOCATION, DEFAULT_PRODUCT_RATING, Product, ProductCreate, ProductDetail,
    ProductListing, SellerSummary, posted_date,
};
use shared::util::{now_millis, snowflake_id};

use crate::auth::CurrentUser;
use crate::catalog::ProductQuery;
use crate::db::products;
use crate::error::ServiceResult;
use crate::services::upload::{self, ImageUpload};
use crate::state::AppState;

fn to_listing(product: Product, seller: SellerSummary, now: i64) -> ProductListing {
    let posted_date = posted_date(product.created_at, now);
    ProductListing {
        product,
        seller,
        posted_date,
    }
}

pub async fn search(state: &AppState, query: &ProductQuery) -> ServiceResult<Vec<ProductListing>> {
    let filter = query.to_builder()?;
    let rows = products::search(&state.pool, &filter, query.sort_key()).await?;
    let now = now_millis();
    Ok(rows
        .into_iter()
        .map(|(product, seller)| to_listing(product, seller, now))
        .collect())
}

pub async fn detail(state: &AppState, id: i64) -> ServiceResult<ProductDetail> {
    let (product, seller) = products::find_detail(&state.pool, id)
        .await?
        .ok_or(ErrorCode::ProductNotFound)?;
    let posted_date = posted_date(product.created_at, now_millis());
    Ok(ProductDetail {
        product,
        seller,
        posted_date,
    })
}

pub async fn seller_listings(
    state: &AppState,
    seller_id: i64,
) -> ServiceResult<Vec<ProductListing>> {
    let rows = products::find_by_seller(&state.pool, seller_id).await?;
    let now = now_millis();
    Ok(rows
        .into_iter()
        .map(|(product, seller)| to_listing(product, seller, now))
        .collect())
}

/// Raw create-listing form as submitted (multipart text fields + optional file)
#[derive(Debug, Default)]
pub struct ListingForm {
    pub title: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub subject: String,
    pub condition: String,
    pub is_blockchain_verified: String,
    pub location: String,
    /// Image URL, used when no file is uploaded
    pub image: String,
    pub images: Vec<String>,
    pub image_file: Option<ImageUpload>,
}

impl ListingForm {
    /// Record a text field; unknown names are ignored
    pub fn set_field(&mut self, name: &str, value: String) {
        match name {
            "title" => self.title = value,
            "description" => self.description = value,
            "price" => self.price = value,
            "category" => self.category = value,
            "subject" => self.subject = value,
            "condition" => self.condition = value,
            "is_blockchain_verified" | "isBlockchainVerified" => {
                self.is_blockchain_verified = value
            }
            "location" => self.location = value,
            "image" => self.image = value,
            "images" | "images[]" => self.push_images(&value),
            _ => {}
        }
    }

    /// Gallery entries arrive either repeated or as one JSON array
    fn push_images(&mut self, value: &str) {
        let value = value.trim();
        if value.starts_with('[') {
            if let Ok(list) = serde_json::from_str::<Vec<String>>(value) {
                self.images
                    .extend(list.into_iter().filter(|s| !s.trim().is_empty()));
            }
        } else if !value.is_empty() {
            self.images.push(value.to_string());
        }
    }

    /// Check required fields and the price; the image is resolved separately
    pub fn validate(&self) -> AppResult<ProductCreate> {
        let title = required("title", &self.title)?;
        let description = required("description", &self.description)?;
        let price_raw = required("price", &self.price)?;
        let category = required("category", &self.category)?;
        let condition = required("condition", &self.condition)?;
        let subject = required("subject", &self.subject)?;

        let price = price_raw
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p > 0.0)
            .ok_or_else(|| AppError::new(ErrorCode::ProductInvalidPrice).with_detail("field", "price"))?;

        if self.image_file.is_none() && self.image.trim().is_empty() {
            return Err(AppError::required("image"));
        }

        let location = Some(self.location.trim())
            .filter(|l| !l.is_empty())
            .map(String::from);

        Ok(ProductCreate {
            title: title.to_string(),
            description: description.to_string(),
            price,
            image: self.image.trim().to_string(),
            images: self.images.clone(),
            category: category.to_string(),
            subject: subject.to_string(),
            condition: condition.to_string(),
            is_blockchain_verified: self.is_blockchain_verified.trim() == "true",
            location,
        })
    }
}

fn required<'a>(field: &str, value: &'a str) -> AppResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::required(field));
    }
    Ok(trimmed)
}

pub async fn create(
    state: &AppState,
    seller: &CurrentUser,
    mut form: ListingForm,
) -> ServiceResult<Product> {
    let mut fields = form.validate()?;

    // Only touch the disk once the text fields are known to be valid
    if let Some(file) = form.image_file.take() {
        fields.image = upload::store_image(&state.upload_dir, file).await?;
    }

    let now = now_millis();
    let product = Product {
        id: snowflake_id(),
        title: fields.title,
        description: fields.description,
        price: fields.price,
        image: fields.image,
        images: fields.images,
        category: fields.category,
        subject: fields.subject,
        condition: fields.condition,
        seller_id: seller.id,
        seller_name: seller.name.clone(),
        rating: DEFAULT_PRODUCT_RATING,
        is_blockchain_verified: fields.is_blockchain_verified,
        location: fields
            .location
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        created_at: now,
        updated_at: now,
    };

    products::create(&state.pool, &product).await?;

    tracing::info!(
        product_id = product.id,
        seller_id = seller.id,
        category = %product.category,
        "Product listed"
    );
    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ListingForm {
        let mut form = ListingForm::default();
        for (name, value) in [
            ("title", "Physics Textbook"),
            ("description", "HC Verma vol 1"),
            ("price", "300"),
            ("category", "Textbooks"),
            ("subject", "Physics"),
            ("condition", "Good"),
            ("image", "https://img.test/hc.jpg"),
        ] {
            form.set_field(name, value.to_string());
        }
        form
    }

    #[test]
    fn test_valid_form_defaults() {
        let fields = form().validate().unwrap();
        assert_eq!(fields.price, 300.0);
        assert!(!fields.is_blockchain_verified);
        assert!(fields.location.is_none());
        assert!(fields.images.is_empty());
    }

    #[test]
    fn test_missing_field_named() {
        let mut f = form();
        f.set_field("condition", " ".into());
        let err = f.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.message, "condition is required");
    }

    #[test]
    fn test_non_positive_price_rejected() {
        for bad in ["0", "-5", "abc", "NaN"] {
            let mut f = form();
            f.set_field("price", bad.into());
            assert_eq!(
                f.validate().unwrap_err().code,
                ErrorCode::ProductInvalidPrice,
                "{bad}"
            );
        }
    }

    #[test]
    fn test_image_required_without_file() {
        let mut f = form();
        f.set_field("image", String::new());
        assert_eq!(f.validate().unwrap_err().code, ErrorCode::RequiredField);

        f.image_file = Some(ImageUpload {
            file_name: Some("a.png".into()),
            data: vec![1],
        });
        assert!(f.validate().is_ok());
    }

    #[test]
    fn test_gallery_and_flags() {
        let mut f = form();
        f.set_field("images", r#"["/a.jpg", "", "/b.jpg"]"#.into());
        f.set_field("images", "/c.jpg".into());
        f.set_field("isBlockchainVerified", "true".into());
        f.set_field("location", "Library".into());
        let fields = f.validate().unwrap();
        assert_eq!(fields.images, vec!["/a.jpg", "/b.jpg", "/c.jpg"]);
        assert!(fields.is_blockchain_verified);
        assert_eq!(fields.location.as_deref(), Some("Library"));
    }
}
