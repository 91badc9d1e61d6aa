//! Wishlist Model

use serde::{Deserialize, Serialize};

/// Wishlist add payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistAdd {
    #[serde(
        rename = "productId",
        alias = "product_id",
        deserialize_with = "crate::util::deserialize_id"
    )]
    pub product_id: i64,
}

/// Response for DELETE /api/wishlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistCleared {
    pub message: String,
}

impl Default for WishlistCleared {
    fn default() -> Self {
        Self {
            message: "Wishlist cleared".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_accepts_camel_case() {
        let add: WishlistAdd = serde_json::from_str(r#"{"productId": 42}"#).unwrap();
        assert_eq!(add.product_id, 42);
        let add: WishlistAdd = serde_json::from_str(r#"{"product_id": 43}"#).unwrap();
        assert_eq!(add.product_id, 43);
        let add: WishlistAdd = serde_json::from_str(r#"{"productId": "44"}"#).unwrap();
        assert_eq!(add.product_id, 44);
    }
}
