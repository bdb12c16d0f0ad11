//! Database operations for coupons.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use ondine_core::{CouponId, CouponKind};

use super::RepositoryError;

/// A discount coupon.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Coupon {
    #[serde(skip)]
    pub id: CouponId,
    pub code: String,
    pub kind: CouponKind,
    /// Percentage (0-100) for `percent` coupons, absolute amount for
    /// `fixed` ones.
    pub value: Decimal,
    pub min_order_total: Decimal,
    pub expires_at: Option<DateTime<Utc>>,
    pub usage_limit: Option<i32>,
    pub times_used: i32,
    pub active: bool,
}

/// Look up a coupon by its code.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn get_by_code(pool: &PgPool, code: &str) -> Result<Option<Coupon>, RepositoryError> {
    let coupon = sqlx::query_as::<_, Coupon>(
        r"
        SELECT id, code, kind, value, min_order_total, expires_at,
               usage_limit, times_used, active
        FROM storefront.coupon
        WHERE code = $1
        ",
    )
    .bind(code)
    .fetch_optional(pool)
    .await?;

    Ok(coupon)
}

/// Record one use of a coupon, respecting its usage limit.
///
/// # Returns
///
/// `true` if the use was recorded, `false` if the limit was already
/// reached (a concurrent redemption won the last slot).
///
/// # Errors
///
/// Returns error if the database update fails.
pub async fn record_use(pool: &PgPool, coupon_id: CouponId) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE storefront.coupon
        SET times_used = times_used + 1
        WHERE id = $1
          AND active
          AND (usage_limit IS NULL OR times_used < usage_limit)
        ",
    )
    .bind(coupon_id.as_i32())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
