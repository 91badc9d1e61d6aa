//! Product Model

use serde::{Deserialize, Serialize};

/// Default rating for every listing; never recomputed
pub const DEFAULT_PRODUCT_RATING: f64 = 5.0;

/// Default pickup location
pub const DEFAULT_LOCATION: &str = "Campus";

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Price in major currency units
    pub price: f64,
    /// Primary image path (`/uploads/...`) or URL
    pub image: String,
    /// Optional gallery
    #[cfg_attr(feature = "db", sqlx(json))]
    pub images: Vec<String>,
    pub category: String,
    pub subject: String,
    pub condition: String,
    /// Weak reference to the selling user
    pub seller_id: i64,
    /// Seller display name at listing time
    pub seller_name: String,
    pub rating: f64,
    /// Label only, nothing is verified
    pub is_blockchain_verified: bool,
    pub location: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload (fields of the multipart form)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub images: Vec<String>,
    pub category: String,
    pub subject: String,
    pub condition: String,
    pub is_blockchain_verified: bool,
    pub location: Option<String>,
}

/// Seller fields attached to catalog results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SellerSummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: i64,
    pub name: String,
    pub rating: f64,
}

/// Seller fields attached to the product detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SellerProfile {
    #[serde(rename = "_id", alias = "id")]
    pub id: i64,
    pub name: String,
    pub rating: f64,
    pub total_sales: i64,
    pub avatar: String,
    pub department: String,
    pub year: String,
}

/// Catalog list entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    #[serde(flatten)]
    pub product: Product,
    pub seller: SellerSummary,
    pub posted_date: String,
}

/// Product detail entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub seller: SellerProfile,
    pub posted_date: String,
}

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Relative "posted" label for a listing created at `created_at` (ms).
///
/// Buckets: same day, days, weeks (under 30 days), then months of 30 days.
pub fn posted_date(created_at: i64, now: i64) -> String {
    let days = (now - created_at).abs() / DAY_MS;
    match days {
        0 => "Just now".to_string(),
        1 => "1 day ago".to_string(),
        2..7 => format!("{days} days ago"),
        7..14 => "1 week ago".to_string(),
        14..30 => format!("{} weeks ago", days / 7),
        30..60 => "1 month ago".to_string(),
        _ => format!("{} months ago", days / 30),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_750_000_000_000;

    fn ago(days: i64) -> i64 {
        NOW - days * DAY_MS
    }

    #[test]
    fn test_posted_date_buckets() {
        assert_eq!(posted_date(NOW, NOW), "Just now");
        assert_eq!(posted_date(NOW - 3_600_000, NOW), "Just now");
        assert_eq!(posted_date(ago(1), NOW), "1 day ago");
        assert_eq!(posted_date(ago(6), NOW), "6 days ago");
        assert_eq!(posted_date(ago(7), NOW), "1 week ago");
        assert_eq!(posted_date(ago(13), NOW), "1 week ago");
        assert_eq!(posted_date(ago(14), NOW), "2 weeks ago");
        assert_eq!(posted_date(ago(29), NOW), "4 weeks ago");
        assert_eq!(posted_date(ago(30), NOW), "1 month ago");
        assert_eq!(posted_date(ago(95), NOW), "3 months ago");
    }

    #[test]
    fn test_listing_flattens_product_fields() {
        let listing = ProductListing {
            product: Product {
                id: 7,
                title: "Physics Textbook".into(),
                description: "HC Verma vol 1".into(),
                price: 300.0,
                image: "/uploads/abc.jpg".into(),
                images: vec![],
                category: "Textbooks".into(),
                subject: "Physics".into(),
                condition: "Good".into(),
                seller_id: 1,
                seller_name: "Asha".into(),
                rating: DEFAULT_PRODUCT_RATING,
                is_blockchain_verified: false,
                location: DEFAULT_LOCATION.into(),
                created_at: NOW,
                updated_at: NOW,
            },
            seller: SellerSummary {
                id: 1,
                name: "Asha".into(),
                rating: 4.5,
            },
            posted_date: "Just now".into(),
        };

        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["_id"], 7);
        assert_eq!(json["title"], "Physics Textbook");
        assert_eq!(json["sellerId"], 1);
        assert_eq!(json["sellerName"], "Asha");
        assert_eq!(json["isBlockchainVerified"], false);
        assert_eq!(json["createdAt"], NOW);
        assert_eq!(json["seller"]["_id"], 1);
        assert_eq!(json["seller"]["rating"], 4.5);
        assert_eq!(json["postedDate"], "Just now");
        assert!(json.get("posted_date").is_none());
    }
}
