use serde::Deserialize;
use shared::error::{AppError, AppResult, ErrorCode};
use sqlx::Sqlite;
use sqlx::query::QueryAs;
use sqlx::sqlite::SqliteArguments;

/// Query builder for constructing SQL queries with dynamic WHERE conditions
#[derive(Debug, Default)]
pub struct QueryBuilder {
    conditions: Vec<String>,
    bindings: Vec<QueryValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition; its placeholders are filled by the binds that follow
    pub fn add_condition(&mut self, condition: &str) -> &mut Self {
        self.conditions.push(condition.to_string());
        self
    }

    pub fn bind_text(&mut self, value: impl Into<String>) -> &mut Self {
        self.bindings.push(QueryValue::Text(value.into()));
        self
    }

    pub fn bind_i64(&mut self, value: i64) -> &mut Self {
        self.bindings.push(QueryValue::Integer(value));
        self
    }

    pub fn bind_f64(&mut self, value: f64) -> &mut Self {
        self.bindings.push(QueryValue::Float(value));
        self
    }

    /// Substring match on `field`; LIKE wildcards in `term` match literally
    pub fn add_contains_condition(&mut self, field: &str, term: &str) -> &mut Self {
        self.conditions.push(format!("{field} LIKE ? ESCAPE '\\'"));
        self.bindings
            .push(QueryValue::Text(format!("%{}%", escape_like(term))));
        self
    }

    /// Build WHERE clause (empty if no conditions)
    pub fn build_where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn bindings(&self) -> &[QueryValue] {
        &self.bindings
    }

    /// Apply bindings to a SQLx query_as
    pub fn apply_bindings<'q, O>(
        &self,
        mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    ) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
        for binding in &self.bindings {
            query = match binding {
                QueryValue::Text(s) => query.bind(s.clone()),
                QueryValue::Integer(i) => query.bind(*i),
                QueryValue::Float(f) => query.bind(*f),
            };
        }
        query
    }
}

/// Escape `\`, `%` and `_` for a LIKE pattern using `\` as the escape char
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Catalog sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    PriceLowHigh,
    PriceHighLow,
}

impl SortKey {
    /// Unknown or absent keys fall back to `Newest`
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("oldest") => SortKey::Oldest,
            Some("price-low-high") => SortKey::PriceLowHigh,
            Some("price-high-low") => SortKey::PriceHighLow,
            _ => SortKey::Newest,
        }
    }

    /// ORDER BY clause; ties break on id in the same direction
    pub fn order_clause(self) -> &'static str {
        match self {
            SortKey::Newest => " ORDER BY p.created_at DESC, p.id DESC",
            SortKey::Oldest => " ORDER BY p.created_at ASC, p.id ASC",
            SortKey::PriceLowHigh => " ORDER BY p.price ASC, p.id ASC",
            SortKey::PriceHighLow => " ORDER BY p.price DESC, p.id DESC",
        }
    }
}

pub const ALL_CATEGORIES: &str = "All Categories";
pub const ALL_SUBJECTS: &str = "All Subjects";
pub const ALL_CONDITIONS: &str = "All Conditions";

/// Query string of GET /api/products.
///
/// Numeric bounds are kept as text so a malformed value becomes a
/// validation error instead of an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub subject: Option<String>,
    pub condition: Option<String>,
    #[serde(alias = "minPrice")]
    pub min_price: Option<String>,
    #[serde(alias = "maxPrice")]
    pub max_price: Option<String>,
    #[serde(alias = "blockchainVerified")]
    pub blockchain_verified: Option<String>,
    pub sort: Option<String>,
}

impl ProductQuery {
    pub fn sort_key(&self) -> SortKey {
        SortKey::parse(self.sort.as_deref())
    }

    /// Compose every active filter into one AND-ed WHERE clause
    pub fn to_builder(&self) -> AppResult<QueryBuilder> {
        let mut builder = QueryBuilder::new();

        // title_search is stored lower-cased
        if let Some(term) = active(&self.search, "") {
            builder.add_contains_condition("p.title_search", &term.to_lowercase());
        }
        if let Some(category) = active(&self.category, ALL_CATEGORIES) {
            builder.add_condition("p.category = ?").bind_text(category);
        }
        if let Some(subject) = active(&self.subject, ALL_SUBJECTS) {
            builder.add_condition("p.subject = ?").bind_text(subject);
        }
        if let Some(condition) = active(&self.condition, ALL_CONDITIONS) {
            builder.add_condition("p.condition = ?").bind_text(condition);
        }

        // A single bound is ignored
        if let (Some(min), Some(max)) = (active(&self.min_price, ""), active(&self.max_price, "")) {
            let min = parse_price("min_price", min)?;
            let max = parse_price("max_price", max)?;
            builder
                .add_condition("p.price BETWEEN ? AND ?")
                .bind_f64(min)
                .bind_f64(max);
        }

        if self.blockchain_verified.as_deref() == Some("true") {
            builder.add_condition("p.is_blockchain_verified = 1");
        }

        Ok(builder)
    }
}

/// Trimmed value unless empty or equal to the "no filter" sentinel
fn active<'a>(value: &'a Option<String>, sentinel: &str) -> Option<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != sentinel)
}

fn parse_price(field: &str, raw: &str) -> AppResult<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::InvalidFormat, format!("{field} must be a number"))
                .with_detail("field", field)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> ProductQuery {
        ProductQuery::default()
    }

    #[test]
    fn test_empty_where_clause() {
        let builder = query().to_builder().unwrap();
        assert_eq!(builder.build_where_clause(), "");
        assert!(builder.bindings().is_empty());
    }

    #[test]
    fn test_multiple_conditions() {
        let mut builder = QueryBuilder::new();
        builder
            .add_condition("p.category = ?")
            .bind_text("Notes")
            .add_condition("p.price > ?")
            .bind_f64(100.0);
        assert_eq!(
            builder.build_where_clause(),
            " WHERE p.category = ? AND p.price > ?"
        );
    }

    #[test]
    fn test_sentinels_mean_no_filter() {
        let q = ProductQuery {
            category: Some(ALL_CATEGORIES.into()),
            subject: Some(ALL_SUBJECTS.into()),
            condition: Some(ALL_CONDITIONS.into()),
            search: Some("   ".into()),
            ..query()
        };
        assert_eq!(q.to_builder().unwrap().build_where_clause(), "");
    }

    #[test]
    fn test_search_escapes_wildcards() {
        let q = ProductQuery {
            search: Some("100%_OFF\\".into()),
            ..query()
        };
        let builder = q.to_builder().unwrap();
        assert_eq!(
            builder.build_where_clause(),
            " WHERE p.title_search LIKE ? ESCAPE '\\'"
        );
        assert_eq!(
            builder.bindings(),
            &[QueryValue::Text("%100\\%\\_off\\\\%".into())]
        );
    }

    #[test]
    fn test_price_range_needs_both_bounds() {
        let q = ProductQuery {
            min_price: Some("100".into()),
            ..query()
        };
        assert_eq!(q.to_builder().unwrap().build_where_clause(), "");

        let q = ProductQuery {
            min_price: Some("100".into()),
            max_price: Some("500".into()),
            ..query()
        };
        let builder = q.to_builder().unwrap();
        assert_eq!(builder.build_where_clause(), " WHERE p.price BETWEEN ? AND ?");
        assert_eq!(
            builder.bindings(),
            &[QueryValue::Float(100.0), QueryValue::Float(500.0)]
        );
    }

    #[test]
    fn test_malformed_price_is_invalid_format() {
        let q = ProductQuery {
            min_price: Some("cheap".into()),
            max_price: Some("500".into()),
            ..query()
        };
        let err = q.to_builder().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn test_blockchain_filter_only_on_literal_true() {
        for raw in ["false", "TRUE", "1", ""] {
            let q = ProductQuery {
                blockchain_verified: Some(raw.into()),
                ..query()
            };
            assert_eq!(q.to_builder().unwrap().build_where_clause(), "", "{raw}");
        }
        let q = ProductQuery {
            blockchain_verified: Some("true".into()),
            ..query()
        };
        assert_eq!(
            q.to_builder().unwrap().build_where_clause(),
            " WHERE p.is_blockchain_verified = 1"
        );
    }

    #[test]
    fn test_sort_key_fallback() {
        assert_eq!(SortKey::parse(None), SortKey::Newest);
        assert_eq!(SortKey::parse(Some("cheapest")), SortKey::Newest);
        assert_eq!(SortKey::parse(Some("oldest")), SortKey::Oldest);
        assert_eq!(SortKey::parse(Some("price-low-high")), SortKey::PriceLowHigh);
        assert_eq!(SortKey::parse(Some("price-high-low")), SortKey::PriceHighLow);
    }

    #[test]
    fn test_camel_case_params() {
        let q: ProductQuery = serde_json::from_str(
            r#"{"minPrice":"10","maxPrice":"20","blockchainVerified":"true"}"#,
        )
        .unwrap();
        assert_eq!(q.min_price.as_deref(), Some("10"));
        assert_eq!(q.max_price.as_deref(), Some("20"));
        assert_eq!(q.blockchain_verified.as_deref(), Some("true"));
    }
}
