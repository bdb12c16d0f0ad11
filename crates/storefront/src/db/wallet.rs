//! Database operations for the loyalty wallet.
//!
//! One wallet per user: a balance row plus an append-only transaction
//! ledger. The balance is only ever moved together with a ledger entry,
//! inside a transaction, and a debit is conditional on sufficient funds
//! so the balance can never go negative.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use ondine_core::{UserId, WalletTransactionId};

use super::RepositoryError;

/// Direction of a wallet ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, sqlx::Type)]
#[sqlx(type_name = "wallet_entry_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WalletEntryKind {
    Credit,
    Debit,
}

/// A wallet ledger entry.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct WalletTransaction {
    pub id: WalletTransactionId,
    #[serde(skip)]
    pub user_id: UserId,
    pub kind: WalletEntryKind,
    pub amount: Decimal,
    pub reason: String,
    /// Free-form reference (gift-card code, package id, ...).
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Get a user's wallet balance, zero if no wallet row exists yet.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn balance(pool: &PgPool, user_id: UserId) -> Result<Decimal, RepositoryError> {
    let balance: Option<Decimal> = sqlx::query_scalar(
        r"
        SELECT balance FROM storefront.wallet_account WHERE user_id = $1
        ",
    )
    .bind(user_id.as_i32())
    .fetch_optional(pool)
    .await?;

    Ok(balance.unwrap_or_default())
}

/// List a user's most recent ledger entries, newest first.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn list_transactions(
    pool: &PgPool,
    user_id: UserId,
    limit: i64,
) -> Result<Vec<WalletTransaction>, RepositoryError> {
    let transactions = sqlx::query_as::<_, WalletTransaction>(
        r"
        SELECT id, user_id, kind, amount, reason, reference, created_at
        FROM storefront.wallet_transaction
        WHERE user_id = $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2
        ",
    )
    .bind(user_id.as_i32())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(transactions)
}

/// Credit a user's wallet.
///
/// Returns the new balance.
///
/// # Errors
///
/// Returns error if the database transaction fails.
pub async fn credit(
    pool: &PgPool,
    user_id: UserId,
    amount: Decimal,
    reason: &str,
    reference: Option<&str>,
) -> Result<Decimal, RepositoryError> {
    let mut tx = pool.begin().await?;
    let new_balance = credit_in_tx(&mut tx, user_id, amount, reason, reference).await?;
    tx.commit().await?;
    Ok(new_balance)
}

/// Credit a wallet inside an existing transaction.
///
/// Used by multi-step operations (gift-card redemption, return refunds)
/// that must move the balance together with their own writes.
///
/// # Errors
///
/// Returns error if a query fails.
pub async fn credit_in_tx(
    tx: &mut PgConnection,
    user_id: UserId,
    amount: Decimal,
    reason: &str,
    reference: Option<&str>,
) -> Result<Decimal, RepositoryError> {
    let new_balance: Decimal = sqlx::query_scalar(
        r"
        INSERT INTO storefront.wallet_account (user_id, balance)
        VALUES ($1, $2)
        ON CONFLICT (user_id)
        DO UPDATE SET balance = storefront.wallet_account.balance + EXCLUDED.balance,
                      updated_at = NOW()
        RETURNING balance
        ",
    )
    .bind(user_id.as_i32())
    .bind(amount)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r"
        INSERT INTO storefront.wallet_transaction (user_id, kind, amount, reason, reference)
        VALUES ($1, 'credit', $2, $3, $4)
        ",
    )
    .bind(user_id.as_i32())
    .bind(amount)
    .bind(reason)
    .bind(reference)
    .execute(&mut *tx)
    .await?;

    Ok(new_balance)
}

/// Debit a user's wallet.
///
/// Returns the new balance.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` when the balance is insufficient;
/// the balance never goes negative.
pub async fn debit(
    pool: &PgPool,
    user_id: UserId,
    amount: Decimal,
    reason: &str,
    reference: Option<&str>,
) -> Result<Decimal, RepositoryError> {
    let mut tx = pool.begin().await?;

    let new_balance: Option<Decimal> = sqlx::query_scalar(
        r"
        UPDATE storefront.wallet_account
        SET balance = balance - $2, updated_at = NOW()
        WHERE user_id = $1 AND balance >= $2
        RETURNING balance
        ",
    )
    .bind(user_id.as_i32())
    .bind(amount)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(new_balance) = new_balance else {
        return Err(RepositoryError::Conflict("insufficient funds".to_owned()));
    };

    sqlx::query(
        r"
        INSERT INTO storefront.wallet_transaction (user_id, kind, amount, reason, reference)
        VALUES ($1, 'debit', $2, $3, $4)
        ",
    )
    .bind(user_id.as_i32())
    .bind(amount)
    .bind(reason)
    .bind(reference)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(new_balance)
}
