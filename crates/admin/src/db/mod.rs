//! Database operations for the admin `PostgreSQL` databases.
//!
//! # Databases
//!
//! The back office talks to two databases:
//!
//! - **admin** (`ondine_admin`): admin identities and sessions, in the
//!   `admin` schema. Never reachable from the storefront binary.
//! - **store** (`ondine_storefront`): the storefront's database, reached
//!   through a second pool for dispatch, returns and catalogue
//!   management.
//!
//! # Migrations
//!
//! Admin migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p ondine-cli -- migrate admin
//! ```

pub mod admin_users;
pub mod coupons;
pub mod gift_cards;
pub mod packages;
pub mod posts;
pub mod returns;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use admin_users::AdminUserRepository;

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

    /// Constraint violation (e.g., duplicate coupon code).
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
