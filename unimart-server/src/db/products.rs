//! Product Repository

use super::RepoResult;
use crate::catalog::{QueryBuilder, SortKey};
use shared::models::{Product, SellerProfile, SellerSummary};
use sqlx::SqlitePool;

const PRODUCT_COLUMNS: &str = "p.id, p.title, p.description, p.price, p.image, p.images, p.category, p.subject, p.condition, p.seller_id, p.seller_name, p.rating, p.is_blockchain_verified, p.location, p.created_at, p.updated_at";

/// Product joined with the seller's current summary
#[derive(sqlx::FromRow)]
struct ListingRow {
    #[sqlx(flatten)]
    product: Product,
    seller_display_name: String,
    seller_rating: f64,
}

impl ListingRow {
    fn into_parts(self) -> (Product, SellerSummary) {
        let seller = SellerSummary {
            id: self.product.seller_id,
            name: self.seller_display_name,
            rating: self.seller_rating,
        };
        (self.product, seller)
    }
}

/// Product joined with the seller's public profile
#[derive(sqlx::FromRow)]
struct DetailRow {
    #[sqlx(flatten)]
    product: Product,
    seller_display_name: String,
    seller_rating: f64,
    seller_total_sales: i64,
    seller_avatar: String,
    seller_department: String,
    seller_year: String,
}

// Sellers are weak references; a missing user falls back to the listing's snapshot
const SELLER_JOIN: &str = "FROM products p LEFT JOIN users u ON u.id = p.seller_id";

pub async fn create(pool: &SqlitePool, product: &Product) -> RepoResult<()> {
    let images = serde_json::to_string(&product.images)
        .map_err(|e| super::RepoError::Validation(format!("images: {e}")))?;

    sqlx::query(
        "INSERT INTO products (id, title, title_search, description, price, image, images, category, subject, condition, seller_id, seller_name, rating, is_blockchain_verified, location, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(product.id)
    .bind(&product.title)
    .bind(product.title.to_lowercase())
    .bind(&product.description)
    .bind(product.price)
    .bind(&product.image)
    .bind(images)
    .bind(&product.category)
    .bind(&product.subject)
    .bind(&product.condition)
    .bind(product.seller_id)
    .bind(&product.seller_name)
    .bind(product.rating)
    .bind(product.is_blockchain_verified)
    .bind(&product.location)
    .bind(product.created_at)
    .bind(product.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(product)
}

/// Product with the seller profile for the detail view
pub async fn find_detail(
    pool: &SqlitePool,
    id: i64,
) -> RepoResult<Option<(Product, SellerProfile)>> {
    let row = sqlx::query_as::<_, DetailRow>(&format!(
        "SELECT {PRODUCT_COLUMNS}, COALESCE(u.name, p.seller_name) AS seller_display_name, COALESCE(u.rating, 5.0) AS seller_rating, COALESCE(u.total_sales, 0) AS seller_total_sales, COALESCE(u.avatar, '') AS seller_avatar, COALESCE(u.department, '') AS seller_department, COALESCE(u.year, '') AS seller_year {SELLER_JOIN} WHERE p.id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| {
        let seller = SellerProfile {
            id: r.product.seller_id,
            name: r.seller_display_name,
            rating: r.seller_rating,
            total_sales: r.seller_total_sales,
            avatar: r.seller_avatar,
            department: r.seller_department,
            year: r.seller_year,
        };
        (r.product, seller)
    }))
}

/// All products matching `filter`, ordered by `sort`, with seller summaries
pub async fn search(
    pool: &SqlitePool,
    filter: &QueryBuilder,
    sort: SortKey,
) -> RepoResult<Vec<(Product, SellerSummary)>> {
    let sql = format!(
        "SELECT {PRODUCT_COLUMNS}, COALESCE(u.name, p.seller_name) AS seller_display_name, COALESCE(u.rating, 5.0) AS seller_rating {SELLER_JOIN}{}{}",
        filter.build_where_clause(),
        sort.order_clause()
    );

    let rows = filter
        .apply_bindings(sqlx::query_as::<_, ListingRow>(&sql))
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(ListingRow::into_parts).collect())
}

/// A seller's own listings, newest first
pub async fn find_by_seller(
    pool: &SqlitePool,
    seller_id: i64,
) -> RepoResult<Vec<(Product, SellerSummary)>> {
    let mut filter = QueryBuilder::new();
    filter.add_condition("p.seller_id = ?").bind_i64(seller_id);
    search(pool, &filter, SortKey::Newest).await
}
