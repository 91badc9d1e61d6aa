//! Catalog search: filter and sort composition for product listings

pub mod query;

pub use query::{ProductQuery, QueryBuilder, SortKey};
