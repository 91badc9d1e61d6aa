//! unimart-server: campus marketplace REST API
//!
//! - Users register with a college email and authenticate with bearer tokens
//! - Listings are searched, filtered and sorted in a single SQL query
//! - Each user keeps a wishlist of products
//! - Payments go through a hosted gateway (Razorpay) with signature verification

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod payment;
pub mod services;
pub mod state;
pub mod util;

pub use config::Config;
pub use state::AppState;
