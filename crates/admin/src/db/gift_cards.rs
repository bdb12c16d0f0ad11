//! Gift card management (store database).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use ondine_core::{GiftCardId, GiftCardStatus};

use super::RepositoryError;

/// A gift card as managed from the back office.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct GiftCard {
    pub id: GiftCardId,
    pub code: String,
    pub initial_balance: Decimal,
    pub remaining_balance: Decimal,
    pub status: GiftCardStatus,
    pub issued_at: DateTime<Utc>,
    pub redeemed_at: Option<DateTime<Utc>>,
}

const COLUMNS: &str =
    "id, code, initial_balance, remaining_balance, status, issued_at, redeemed_at";

/// List all gift cards, newest first.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn list(pool: &PgPool) -> Result<Vec<GiftCard>, RepositoryError> {
    let cards = sqlx::query_as::<_, GiftCard>(&format!(
        r"
        SELECT {COLUMNS}
        FROM storefront.gift_card
        ORDER BY issued_at DESC
        ",
    ))
    .fetch_all(pool)
    .await?;

    Ok(cards)
}

/// Issue a new gift card.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the code already exists (the
/// caller retries with a fresh code).
pub async fn issue(
    pool: &PgPool,
    code: &str,
    balance: Decimal,
) -> Result<GiftCard, RepositoryError> {
    let card = sqlx::query_as::<_, GiftCard>(&format!(
        r"
        INSERT INTO storefront.gift_card (code, initial_balance, remaining_balance)
        VALUES ($1, $2, $2)
        RETURNING {COLUMNS}
        ",
    ))
    .bind(code)
    .bind(balance)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict("gift card code already exists".to_owned());
        }
        RepositoryError::Database(e)
    })?;

    Ok(card)
}

/// Void an active gift card.
///
/// # Returns
///
/// `false` when the card was not in `active` status.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the card doesn't exist.
pub async fn void(pool: &PgPool, id: GiftCardId) -> Result<bool, RepositoryError> {
    let status: Option<GiftCardStatus> = sqlx::query_scalar(
        r"
        SELECT status FROM storefront.gift_card WHERE id = $1
        ",
    )
    .bind(id.as_i32())
    .fetch_optional(pool)
    .await?;

    if status.is_none() {
        return Err(RepositoryError::NotFound);
    }

    let result = sqlx::query(
        r"
        UPDATE storefront.gift_card
        SET status = 'void', remaining_balance = 0
        WHERE id = $1 AND status = 'active'
        ",
    )
    .bind(id.as_i32())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
