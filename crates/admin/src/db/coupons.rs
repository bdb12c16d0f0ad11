//! Coupon management (store database).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use ondine_core::{CouponId, CouponKind};

use super::RepositoryError;

/// A coupon as managed from the back office.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Coupon {
    pub id: CouponId,
    pub code: String,
    pub kind: CouponKind,
    pub value: Decimal,
    pub min_order_total: Decimal,
    pub expires_at: Option<DateTime<Utc>>,
    pub usage_limit: Option<i32>,
    pub times_used: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Parameters for creating a coupon.
#[derive(Debug, serde::Deserialize)]
pub struct CreateCoupon {
    pub code: String,
    pub kind: CouponKind,
    pub value: Decimal,
    #[serde(default)]
    pub min_order_total: Decimal,
    pub expires_at: Option<DateTime<Utc>>,
    pub usage_limit: Option<i32>,
}

const COLUMNS: &str = "id, code, kind, value, min_order_total, expires_at, usage_limit, times_used, active, created_at";

/// List all coupons, newest first.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn list(pool: &PgPool) -> Result<Vec<Coupon>, RepositoryError> {
    let coupons = sqlx::query_as::<_, Coupon>(&format!(
        r"
        SELECT {COLUMNS}
        FROM storefront.coupon
        ORDER BY created_at DESC
        ",
    ))
    .fetch_all(pool)
    .await?;

    Ok(coupons)
}

/// Create a new coupon.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the code already exists.
pub async fn create(pool: &PgPool, params: &CreateCoupon) -> Result<Coupon, RepositoryError> {
    let coupon = sqlx::query_as::<_, Coupon>(&format!(
        r"
        INSERT INTO storefront.coupon
            (code, kind, value, min_order_total, expires_at, usage_limit)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {COLUMNS}
        ",
    ))
    .bind(&params.code)
    .bind(params.kind)
    .bind(params.value)
    .bind(params.min_order_total)
    .bind(params.expires_at)
    .bind(params.usage_limit)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict("coupon code already exists".to_owned());
        }
        RepositoryError::Database(e)
    })?;

    Ok(coupon)
}

/// Deactivate a coupon.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the coupon doesn't exist.
pub async fn deactivate(pool: &PgPool, id: CouponId) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE storefront.coupon
        SET active = FALSE
        WHERE id = $1
        ",
    )
    .bind(id.as_i32())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }

    Ok(())
}

/// Number of active coupons, for the dashboard.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn active_count(pool: &PgPool) -> Result<i64, RepositoryError> {
    let count: i64 =
        sqlx::query_scalar(r"SELECT COUNT(*) FROM storefront.coupon WHERE active")
            .fetch_one(pool)
            .await?;

    Ok(count)
}
