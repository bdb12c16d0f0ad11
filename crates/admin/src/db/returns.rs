//! Returns management (store database).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use ondine_core::{OrderId, ReturnRequestId, ReturnStatus, UserId};

use super::RepositoryError;

/// A return request as seen from the back office.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct ReturnCase {
    pub id: ReturnRequestId,
    #[serde(skip)]
    pub user_id: UserId,
    pub customer_email: String,
    pub order_id: OrderId,
    pub order_number: String,
    pub order_total: Decimal,
    pub reason: String,
    pub status: ReturnStatus,
    pub refund_amount: Option<Decimal>,
    pub requested_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

const SELECT: &str = r#"
    SELECT r.id, r.user_id, u.email AS customer_email,
           r.order_id, o.number AS order_number, o.total AS order_total,
           r.reason, r.status, r.refund_amount, r.requested_at, r.resolved_at
    FROM storefront.return_request r
    JOIN storefront."user" u ON u.id = r.user_id
    JOIN storefront.orders o ON o.id = r.order_id
"#;

/// List return requests, optionally filtered by status, oldest first.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn list(
    pool: &PgPool,
    status: Option<ReturnStatus>,
) -> Result<Vec<ReturnCase>, RepositoryError> {
    let cases = match status {
        Some(status) => {
            sqlx::query_as::<_, ReturnCase>(&format!(
                r"
                {SELECT}
                WHERE r.status = $1
                ORDER BY r.requested_at ASC
                ",
            ))
            .bind(status)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, ReturnCase>(&format!(
                r"
                {SELECT}
                ORDER BY r.requested_at ASC
                ",
            ))
            .fetch_all(pool)
            .await?
        }
    };

    Ok(cases)
}

/// Get one return request by id.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn get(
    pool: &PgPool,
    id: ReturnRequestId,
) -> Result<Option<ReturnCase>, RepositoryError> {
    let case = sqlx::query_as::<_, ReturnCase>(&format!(
        r"
        {SELECT}
        WHERE r.id = $1
        ",
    ))
    .bind(id.as_i32())
    .fetch_optional(pool)
    .await?;

    Ok(case)
}

/// Move a return request between statuses.
///
/// Conditional on the status the caller validated against, so a
/// concurrent change makes this a no-op instead of an overwrite.
///
/// # Returns
///
/// `false` when the request was no longer in `from` status.
///
/// # Errors
///
/// Returns error if the database update fails.
pub async fn set_status(
    pool: &PgPool,
    id: ReturnRequestId,
    from: ReturnStatus,
    to: ReturnStatus,
) -> Result<bool, RepositoryError> {
    let resolved = matches!(to, ReturnStatus::Rejected | ReturnStatus::Refunded);

    let result = sqlx::query(
        r"
        UPDATE storefront.return_request
        SET status = $3,
            resolved_at = CASE WHEN $4 THEN NOW() ELSE resolved_at END
        WHERE id = $1 AND status = $2
        ",
    )
    .bind(id.as_i32())
    .bind(from)
    .bind(to)
    .bind(resolved)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Refund a received return: mark it refunded and credit the customer's
/// wallet, in one transaction.
///
/// # Returns
///
/// `false` when the request was not in `received` status.
///
/// # Errors
///
/// Returns error if the database transaction fails.
pub async fn refund(
    pool: &PgPool,
    id: ReturnRequestId,
    user_id: UserId,
    amount: Decimal,
    reference: &str,
) -> Result<bool, RepositoryError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r"
        UPDATE storefront.return_request
        SET status = 'refunded', refund_amount = $2, resolved_at = NOW()
        WHERE id = $1 AND status = 'received'
        ",
    )
    .bind(id.as_i32())
    .bind(amount)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query(
        r"
        INSERT INTO storefront.wallet_account (user_id, balance)
        VALUES ($1, $2)
        ON CONFLICT (user_id)
        DO UPDATE SET balance = storefront.wallet_account.balance + EXCLUDED.balance,
                      updated_at = NOW()
        ",
    )
    .bind(user_id.as_i32())
    .bind(amount)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
        INSERT INTO storefront.wallet_transaction (user_id, kind, amount, reason, reference)
        VALUES ($1, 'credit', $2, 'return refunded', $3)
        ",
    )
    .bind(user_id.as_i32())
    .bind(amount)
    .bind(reference)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(true)
}

/// Number of unresolved return requests, for the dashboard.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn pending_count(pool: &PgPool) -> Result<i64, RepositoryError> {
    let count: i64 = sqlx::query_scalar(
        r"
        SELECT COUNT(*)
        FROM storefront.return_request
        WHERE status IN ('requested', 'approved', 'received')
        ",
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
