//! Database operations for gift cards.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use ondine_core::{GiftCardId, GiftCardStatus, UserId};

use super::{RepositoryError, wallet};

/// A gift card issued by the back office.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct GiftCard {
    #[serde(skip)]
    pub id: GiftCardId,
    pub code: String,
    pub initial_balance: Decimal,
    pub remaining_balance: Decimal,
    pub status: GiftCardStatus,
    pub issued_at: DateTime<Utc>,
    pub redeemed_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub redeemed_by: Option<UserId>,
}

/// Look up a gift card by its code.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn get_by_code(pool: &PgPool, code: &str) -> Result<Option<GiftCard>, RepositoryError> {
    let card = sqlx::query_as::<_, GiftCard>(
        r"
        SELECT id, code, initial_balance, remaining_balance, status,
               issued_at, redeemed_at, redeemed_by
        FROM storefront.gift_card
        WHERE code = $1
        ",
    )
    .bind(code)
    .fetch_optional(pool)
    .await?;

    Ok(card)
}

/// Redeem a gift card into a user's wallet.
///
/// Transfers the card's remaining balance to the wallet, marks the card
/// redeemed and writes the ledger entry, all in one transaction.
///
/// Returns the credited amount.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if no card has this code.
/// Returns `RepositoryError::Conflict` if the card is already redeemed
/// or void.
pub async fn redeem(
    pool: &PgPool,
    user_id: UserId,
    code: &str,
) -> Result<Decimal, RepositoryError> {
    let mut tx = pool.begin().await?;

    // Lock the card row so two concurrent redemptions serialize; the
    // conditional update below then settles the race.
    let card = sqlx::query_as::<_, GiftCard>(
        r"
        SELECT id, code, initial_balance, remaining_balance, status,
               issued_at, redeemed_at, redeemed_by
        FROM storefront.gift_card
        WHERE code = $1
        FOR UPDATE
        ",
    )
    .bind(code)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    if card.status != GiftCardStatus::Active {
        return Err(RepositoryError::Conflict(
            "gift card is no longer active".to_owned(),
        ));
    }

    let amount = card.remaining_balance;

    sqlx::query(
        r"
        UPDATE storefront.gift_card
        SET status = 'redeemed', remaining_balance = 0,
            redeemed_at = NOW(), redeemed_by = $2
        WHERE id = $1 AND status = 'active'
        ",
    )
    .bind(card.id.as_i32())
    .bind(user_id.as_i32())
    .execute(&mut *tx)
    .await?;

    wallet::credit_in_tx(
        &mut tx,
        user_id,
        amount,
        "gift card redeemed",
        Some(&card.code),
    )
    .await?;

    tx.commit().await?;

    Ok(amount)
}
