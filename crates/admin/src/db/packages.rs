//! Dispatch operations on grouped-shipping packages (store database).
//!
//! The same conditional-update discipline as the storefront: a status
//! write names the status it expects, so a dispatch racing a second
//! dispatch (or the sweep racing a manual close) affects zero rows
//! instead of clobbering the row.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use ondine_core::{PackageId, PackageStatus, UserId};

use super::RepositoryError;

/// A package as seen from the dispatch desk, with its owner's email.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct DispatchPackage {
    pub id: PackageId,
    #[serde(skip)]
    pub user_id: UserId,
    pub owner_email: String,
    pub status: PackageStatus,
    pub opened_at: DateTime<Utc>,
    pub closes_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub tracking_reference: Option<String>,
    pub shipping_cost_paid: Decimal,
    /// Number of orders in the package.
    pub order_count: i64,
}

const SELECT: &str = r#"
    SELECT p.id, p.user_id, u.email AS owner_email, p.status,
           p.opened_at, p.closes_at, p.closed_at, p.shipped_at,
           p.tracking_reference, p.shipping_cost_paid,
           COUNT(po.order_id) AS order_count
    FROM storefront.open_package p
    JOIN storefront."user" u ON u.id = p.user_id
    LEFT JOIN storefront.package_order po ON po.package_id = p.id
"#;

/// List closed packages awaiting dispatch, oldest first.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn list_closed(pool: &PgPool) -> Result<Vec<DispatchPackage>, RepositoryError> {
    let packages = sqlx::query_as::<_, DispatchPackage>(&format!(
        r"
        {SELECT}
        WHERE p.status = 'closed'
        GROUP BY p.id, u.email
        ORDER BY p.closed_at ASC
        ",
    ))
    .fetch_all(pool)
    .await?;

    Ok(packages)
}

/// Get one package by id.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn get(
    pool: &PgPool,
    package_id: PackageId,
) -> Result<Option<DispatchPackage>, RepositoryError> {
    let package = sqlx::query_as::<_, DispatchPackage>(&format!(
        r"
        {SELECT}
        WHERE p.id = $1
        GROUP BY p.id, u.email
        ",
    ))
    .bind(package_id.as_i32())
    .fetch_optional(pool)
    .await?;

    Ok(package)
}

/// Mark a closed package shipped (`closed -> shipped`).
///
/// # Returns
///
/// `None` when the package is not in `closed` status.
///
/// # Errors
///
/// Returns error if the database update fails.
pub async fn mark_shipped(
    pool: &PgPool,
    package_id: PackageId,
    tracking_reference: &str,
) -> Result<Option<DispatchPackage>, RepositoryError> {
    let updated = sqlx::query_scalar::<_, i32>(
        r"
        UPDATE storefront.open_package
        SET status = 'shipped', shipped_at = NOW(), tracking_reference = $2
        WHERE id = $1 AND status = 'closed'
        RETURNING id
        ",
    )
    .bind(package_id.as_i32())
    .bind(tracking_reference)
    .fetch_optional(pool)
    .await?;

    if updated.is_none() {
        return Ok(None);
    }

    get(pool, package_id).await
}

/// Auto-close active packages whose window has expired.
///
/// Idempotent: the conditional update only touches rows still `active`
/// past their `closes_at`.
///
/// # Returns
///
/// The number of packages closed by this sweep.
///
/// # Errors
///
/// Returns error if the database update fails.
pub async fn sweep_expired(pool: &PgPool) -> Result<u64, RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE storefront.open_package
        SET status = 'closed', closed_at = NOW()
        WHERE status = 'active' AND closes_at <= NOW()
        ",
    )
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Package counts by status, for the dashboard.
#[derive(Debug, Default, serde::Serialize, sqlx::FromRow)]
pub struct PackageCounts {
    pub active: i64,
    pub closed: i64,
    pub shipped: i64,
}

/// Count packages by status.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn counts(pool: &PgPool) -> Result<PackageCounts, RepositoryError> {
    let counts = sqlx::query_as::<_, PackageCounts>(
        r"
        SELECT COUNT(*) FILTER (WHERE status = 'active')  AS active,
               COUNT(*) FILTER (WHERE status = 'closed')  AS closed,
               COUNT(*) FILTER (WHERE status = 'shipped') AS shipped
        FROM storefront.open_package
        ",
    )
    .fetch_one(pool)
    .await?;

    Ok(counts)
}
