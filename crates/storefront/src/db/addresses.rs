//! Database operations for saved shipping addresses.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use ondine_core::{AddressId, UserId};

use super::RepositoryError;

/// A saved shipping address.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Address {
    pub id: AddressId,
    #[serde(skip)]
    pub user_id: UserId,
    pub recipient: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// Parameters for creating or updating an address.
#[derive(Debug, serde::Deserialize)]
pub struct AddressInput {
    pub recipient: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

const COLUMNS: &str = "id, user_id, recipient, line1, line2, city, postal_code, country, is_default, created_at";

/// List a user's saved addresses, default first.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn list_for_user(pool: &PgPool, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
    let addresses = sqlx::query_as::<_, Address>(&format!(
        r"
        SELECT {COLUMNS}
        FROM storefront.address
        WHERE user_id = $1
        ORDER BY is_default DESC, created_at ASC
        ",
    ))
    .bind(user_id.as_i32())
    .fetch_all(pool)
    .await?;

    Ok(addresses)
}

/// Get an address only if it belongs to the given user.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn get_owned(
    pool: &PgPool,
    user_id: UserId,
    address_id: AddressId,
) -> Result<Option<Address>, RepositoryError> {
    let address = sqlx::query_as::<_, Address>(&format!(
        r"
        SELECT {COLUMNS}
        FROM storefront.address
        WHERE id = $1 AND user_id = $2
        ",
    ))
    .bind(address_id.as_i32())
    .bind(user_id.as_i32())
    .fetch_optional(pool)
    .await?;

    Ok(address)
}

/// Create a new address for a user.
///
/// # Errors
///
/// Returns error if the database insert fails.
pub async fn create(
    pool: &PgPool,
    user_id: UserId,
    input: &AddressInput,
) -> Result<Address, RepositoryError> {
    let address = sqlx::query_as::<_, Address>(&format!(
        r"
        INSERT INTO storefront.address
            (user_id, recipient, line1, line2, city, postal_code, country, is_default)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {COLUMNS}
        ",
    ))
    .bind(user_id.as_i32())
    .bind(&input.recipient)
    .bind(&input.line1)
    .bind(&input.line2)
    .bind(&input.city)
    .bind(&input.postal_code)
    .bind(&input.country)
    .bind(input.is_default)
    .fetch_one(pool)
    .await?;

    Ok(address)
}

/// Update an address owned by the given user.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the address doesn't exist or
/// belongs to another user.
pub async fn update(
    pool: &PgPool,
    user_id: UserId,
    address_id: AddressId,
    input: &AddressInput,
) -> Result<Address, RepositoryError> {
    let address = sqlx::query_as::<_, Address>(&format!(
        r"
        UPDATE storefront.address
        SET recipient = $3, line1 = $4, line2 = $5, city = $6,
            postal_code = $7, country = $8, is_default = $9
        WHERE id = $1 AND user_id = $2
        RETURNING {COLUMNS}
        ",
    ))
    .bind(address_id.as_i32())
    .bind(user_id.as_i32())
    .bind(&input.recipient)
    .bind(&input.line1)
    .bind(&input.line2)
    .bind(&input.city)
    .bind(&input.postal_code)
    .bind(&input.country)
    .bind(input.is_default)
    .fetch_optional(pool)
    .await?;

    address.ok_or(RepositoryError::NotFound)
}

/// Delete an address owned by the given user.
///
/// # Returns
///
/// Returns `true` if the address was deleted, `false` if it didn't exist.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn delete(
    pool: &PgPool,
    user_id: UserId,
    address_id: AddressId,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r"
        DELETE FROM storefront.address
        WHERE id = $1 AND user_id = $2
        ",
    )
    .bind(address_id.as_i32())
    .bind(user_id.as_i32())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
