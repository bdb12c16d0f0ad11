//! Database operations for grouped-shipping packages.
//!
//! A package row is only ever transitioned, never deleted. Status writes
//! are conditional on the current status so a stale caller cannot force
//! an illegal transition past the [`ondine_core::PackageStatus`] table:
//! the `UPDATE ... WHERE status = 'active'` form simply affects zero rows.
//!
//! "One active package per user" is enforced by a partial unique index on
//! `open_package (user_id) WHERE status = 'active'`; a concurrent second
//! insert surfaces as [`RepositoryError::Conflict`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use ondine_core::{
    AddressId, OPEN_WINDOW_SECONDS, OrderId, PackageId, PackageStatus, ShippingMethodId, UserId,
};

use super::RepositoryError;

/// A grouped-shipping package.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct OpenPackage {
    pub id: PackageId,
    #[serde(skip)]
    pub user_id: UserId,
    pub status: PackageStatus,
    pub address_id: AddressId,
    pub shipping_method_id: ShippingMethodId,
    pub opened_at: DateTime<Utc>,
    pub closes_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub tracking_reference: Option<String>,
    /// Shipping charge settled for the whole package; zero until settled.
    pub shipping_cost_paid: Decimal,
}

/// An order linked to a package, with the display fields the package
/// summary needs.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct LinkedOrder {
    pub order_id: OrderId,
    pub number: String,
    pub total: Decimal,
    pub is_paid: bool,
    pub added_at: DateTime<Utc>,
    /// Sum of line-item quantities for the order.
    pub item_count: i64,
}

/// Get the caller's active package, if any.
///
/// No active package is a normal state, not an error.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn get_active(
    pool: &PgPool,
    user_id: UserId,
) -> Result<Option<OpenPackage>, RepositoryError> {
    let package = sqlx::query_as::<_, OpenPackage>(
        r"
        SELECT id, user_id, status, address_id, shipping_method_id,
               opened_at, closes_at, closed_at, shipped_at,
               tracking_reference, shipping_cost_paid
        FROM storefront.open_package
        WHERE user_id = $1 AND status = 'active'
        ",
    )
    .bind(user_id.as_i32())
    .fetch_optional(pool)
    .await?;

    Ok(package)
}

/// Get the caller's most recently opened package regardless of status.
///
/// Used to distinguish "never had a package" from "package already
/// closed" when a close request races the expiry sweep.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn get_latest(
    pool: &PgPool,
    user_id: UserId,
) -> Result<Option<OpenPackage>, RepositoryError> {
    let package = sqlx::query_as::<_, OpenPackage>(
        r"
        SELECT id, user_id, status, address_id, shipping_method_id,
               opened_at, closes_at, closed_at, shipped_at,
               tracking_reference, shipping_cost_paid
        FROM storefront.open_package
        WHERE user_id = $1
        ORDER BY opened_at DESC
        LIMIT 1
        ",
    )
    .bind(user_id.as_i32())
    .fetch_optional(pool)
    .await?;

    Ok(package)
}

/// Open a new package for the caller.
///
/// `opened_at` is server-assigned; `closes_at` is exactly the open window
/// (five days, 432 000 seconds) later, independent of any client clock or
/// timezone.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the caller already has an
/// active package (partial unique index violation).
pub async fn create(
    pool: &PgPool,
    user_id: UserId,
    address_id: AddressId,
    shipping_method_id: ShippingMethodId,
) -> Result<OpenPackage, RepositoryError> {
    #[allow(clippy::cast_precision_loss)] // window is a small constant
    let window_secs = OPEN_WINDOW_SECONDS as f64;

    let package = sqlx::query_as::<_, OpenPackage>(
        r"
        INSERT INTO storefront.open_package
            (user_id, address_id, shipping_method_id, status, opened_at, closes_at)
        VALUES ($1, $2, $3, 'active', NOW(), NOW() + make_interval(secs => $4))
        RETURNING id, user_id, status, address_id, shipping_method_id,
                  opened_at, closes_at, closed_at, shipped_at,
                  tracking_reference, shipping_cost_paid
        ",
    )
    .bind(user_id.as_i32())
    .bind(address_id.as_i32())
    .bind(shipping_method_id.as_i32())
    .bind(window_secs)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict("an active package already exists".to_owned());
        }
        RepositoryError::Database(e)
    })?;

    Ok(package)
}

/// Close the caller's active package (`active -> closed`).
///
/// Only `status` and `closed_at` change; `opened_at`, the settled
/// shipping cost and the order links are untouched.
///
/// # Returns
///
/// `None` when the caller has no active package (either never opened one
/// or it was already closed); the service layer classifies which.
///
/// # Errors
///
/// Returns error if the database update fails.
pub async fn close(pool: &PgPool, user_id: UserId) -> Result<Option<OpenPackage>, RepositoryError> {
    let package = sqlx::query_as::<_, OpenPackage>(
        r"
        UPDATE storefront.open_package
        SET status = 'closed', closed_at = NOW()
        WHERE user_id = $1 AND status = 'active'
        RETURNING id, user_id, status, address_id, shipping_method_id,
                  opened_at, closes_at, closed_at, shipped_at,
                  tracking_reference, shipping_cost_paid
        ",
    )
    .bind(user_id.as_i32())
    .fetch_optional(pool)
    .await?;

    Ok(package)
}

/// Record the settled shipping charge for a package.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the package doesn't exist.
pub async fn record_shipping_payment(
    pool: &PgPool,
    package_id: PackageId,
    amount: Decimal,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE storefront.open_package
        SET shipping_cost_paid = $2
        WHERE id = $1
        ",
    )
    .bind(package_id.as_i32())
    .bind(amount)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }

    Ok(())
}

/// Link an order to a package.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the order is already linked to
/// a package (orders belong to at most one).
pub async fn add_order(
    pool: &PgPool,
    package_id: PackageId,
    order_id: OrderId,
    is_paid: bool,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO storefront.package_order (package_id, order_id, is_paid)
        VALUES ($1, $2, $3)
        ",
    )
    .bind(package_id.as_i32())
    .bind(order_id.as_i32())
    .bind(is_paid)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict("order is already in a package".to_owned());
        }
        RepositoryError::Database(e)
    })?;

    Ok(())
}

/// List the orders linked to a package, oldest first.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn linked_orders(
    pool: &PgPool,
    package_id: PackageId,
) -> Result<Vec<LinkedOrder>, RepositoryError> {
    let orders = sqlx::query_as::<_, LinkedOrder>(
        r"
        SELECT po.order_id, o.number, o.total, po.is_paid, po.added_at,
               COALESCE(SUM(oi.quantity), 0) AS item_count
        FROM storefront.package_order po
        JOIN storefront.orders o ON o.id = po.order_id
        LEFT JOIN storefront.order_item oi ON oi.order_id = o.id
        WHERE po.package_id = $1
        GROUP BY po.order_id, o.number, o.total, po.is_paid, po.added_at
        ORDER BY po.added_at ASC
        ",
    )
    .bind(package_id.as_i32())
    .fetch_all(pool)
    .await?;

    Ok(orders)
}
