//! Database operations for the storefront `PostgreSQL`.
//!
//! # Database: `ondine_storefront`
//!
//! All storefront tables live in the `storefront` schema:
//!
//! - `user`, `user_password` - Customer accounts
//! - `address` - Saved shipping addresses
//! - `shipping_method` - Available shipping methods
//! - `orders`, `order_item` - Placed orders (read model)
//! - `open_package`, `package_order` - Grouped shipping
//! - `wallet_account`, `wallet_transaction` - Loyalty wallet ledger
//! - `gift_card`, `coupon` - Promotions
//! - `post` - News posts
//! - `live_stream`, `stream_message` - Live shopping
//! - `return_request` - Returns
//!
//! Session storage lives in the `tower_sessions` schema.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p ondine-cli -- migrate storefront
//! ```

pub mod addresses;
pub mod coupons;
pub mod gift_cards;
pub mod live;
pub mod orders;
pub mod packages;
pub mod posts;
pub mod returns;
pub mod shipping_methods;
pub mod users;
pub mod wallet;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., second active package).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
