//! Gift card balance and redemption service.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, instrument};

use ondine_core::{GiftCardStatus, UserId};

use crate::db::RepositoryError;
use crate::db::gift_cards;

/// Errors from gift card operations.
#[derive(Debug, thiserror::Error)]
pub enum GiftCardError {
    #[error("no such gift card")]
    Unknown,

    #[error("gift card is no longer active")]
    NotActive,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Balance check result for a gift card code.
#[derive(Debug, serde::Serialize)]
pub struct GiftCardBalance {
    pub code: String,
    pub remaining_balance: Decimal,
    pub status: GiftCardStatus,
}

/// Look up a gift card's remaining balance.
///
/// # Errors
///
/// Returns `GiftCardError::Unknown` for an unknown code.
pub async fn balance(pool: &PgPool, code: &str) -> Result<GiftCardBalance, GiftCardError> {
    let card = gift_cards::get_by_code(pool, code)
        .await?
        .ok_or(GiftCardError::Unknown)?;

    Ok(GiftCardBalance {
        code: card.code,
        remaining_balance: card.remaining_balance,
        status: card.status,
    })
}

/// Redeem a gift card into the caller's wallet.
///
/// Returns the credited amount.
///
/// # Errors
///
/// Returns `GiftCardError::Unknown` for an unknown code and
/// `GiftCardError::NotActive` when the card was already redeemed or
/// voided.
#[instrument(skip(pool, code), fields(user = %user_id))]
pub async fn redeem(pool: &PgPool, user_id: UserId, code: &str) -> Result<Decimal, GiftCardError> {
    let amount = gift_cards::redeem(pool, user_id, code)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => GiftCardError::Unknown,
            RepositoryError::Conflict(_) => GiftCardError::NotActive,
            other => GiftCardError::Repository(other),
        })?;

    info!(amount = %amount, "gift card redeemed into wallet");
    Ok(amount)
}
