//! Business logic between the HTTP handlers and the repositories

pub mod account;
pub mod listing;
pub mod payment;
pub mod upload;
pub mod wishlist;
