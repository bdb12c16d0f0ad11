//! Database operations for return requests (customer side).
//!
//! Customers file requests; the back office moves them through the
//! [`ondine_core::ReturnStatus`] lifecycle.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use ondine_core::{OrderId, ReturnRequestId, ReturnStatus, UserId};

use super::RepositoryError;

/// A return request.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct ReturnRequest {
    pub id: ReturnRequestId,
    #[serde(skip)]
    pub user_id: UserId,
    pub order_id: OrderId,
    pub reason: String,
    pub status: ReturnStatus,
    pub refund_amount: Option<Decimal>,
    pub requested_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// File a return request for an order.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the order already has an open
/// return request.
pub async fn create(
    pool: &PgPool,
    user_id: UserId,
    order_id: OrderId,
    reason: &str,
) -> Result<ReturnRequest, RepositoryError> {
    let request = sqlx::query_as::<_, ReturnRequest>(
        r"
        INSERT INTO storefront.return_request (user_id, order_id, reason, status)
        VALUES ($1, $2, $3, 'requested')
        RETURNING id, user_id, order_id, reason, status, refund_amount,
                  requested_at, resolved_at
        ",
    )
    .bind(user_id.as_i32())
    .bind(order_id.as_i32())
    .bind(reason)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict(
                "a return request already exists for this order".to_owned(),
            );
        }
        RepositoryError::Database(e)
    })?;

    Ok(request)
}

/// List a user's return requests, newest first.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn list_for_user(
    pool: &PgPool,
    user_id: UserId,
) -> Result<Vec<ReturnRequest>, RepositoryError> {
    let requests = sqlx::query_as::<_, ReturnRequest>(
        r"
        SELECT id, user_id, order_id, reason, status, refund_amount,
               requested_at, resolved_at
        FROM storefront.return_request
        WHERE user_id = $1
        ORDER BY requested_at DESC
        ",
    )
    .bind(user_id.as_i32())
    .fetch_all(pool)
    .await?;

    Ok(requests)
}
