//! Database operations for placed orders (read model).
//!
//! Orders are created at checkout, which settles product totals outside
//! this service; the storefront reads them for account pages and for the
//! grouped-shipping flow.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use ondine_core::{OrderId, OrderPaymentStatus, UserId};

use super::RepositoryError;

/// A placed order.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    #[serde(skip)]
    pub user_id: UserId,
    pub number: String,
    pub payment_status: OrderPaymentStatus,
    pub total: Decimal,
    pub placed_at: DateTime<Utc>,
}

/// A line item on an order.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub title: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// List a user's orders, newest first.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn list_for_user(pool: &PgPool, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
    let orders = sqlx::query_as::<_, Order>(
        r"
        SELECT id, user_id, number, payment_status, total, placed_at
        FROM storefront.orders
        WHERE user_id = $1
        ORDER BY placed_at DESC
        ",
    )
    .bind(user_id.as_i32())
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

/// Get an order only if it belongs to the given user.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn get_owned(
    pool: &PgPool,
    user_id: UserId,
    order_id: OrderId,
) -> Result<Option<Order>, RepositoryError> {
    let order = sqlx::query_as::<_, Order>(
        r"
        SELECT id, user_id, number, payment_status, total, placed_at
        FROM storefront.orders
        WHERE id = $1 AND user_id = $2
        ",
    )
    .bind(order_id.as_i32())
    .bind(user_id.as_i32())
    .fetch_optional(pool)
    .await?;

    Ok(order)
}

/// List the line items of an order, as entered.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn items(pool: &PgPool, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
    let items = sqlx::query_as::<_, OrderItem>(
        r"
        SELECT title, quantity, unit_price
        FROM storefront.order_item
        WHERE order_id = $1
        ORDER BY id ASC
        ",
    )
    .bind(order_id.as_i32())
    .fetch_all(pool)
    .await?;

    Ok(items)
}
