//! Coupon validation service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::db::coupons::{self, Coupon};
use crate::db::RepositoryError;

/// Reasons a coupon cannot be applied.
#[derive(Debug, thiserror::Error)]
pub enum CouponError {
    #[error("no such coupon")]
    Unknown,

    #[error("coupon is no longer active")]
    Inactive,

    #[error("coupon has expired")]
    Expired,

    #[error("coupon usage limit reached")]
    Exhausted,

    #[error("order total is below the coupon minimum of {min}")]
    BelowMinimum { min: Decimal },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Outcome of validating a coupon against an order total.
#[derive(Debug, PartialEq, Eq, serde::Serialize)]
pub struct CouponQuote {
    pub code: String,
    pub discount: Decimal,
    pub total_after: Decimal,
}

/// Check a coupon's rules against an order total at a point in time.
///
/// Pure; the caller supplies `now`.
///
/// # Errors
///
/// Returns the first rule the coupon fails.
pub fn evaluate(
    coupon: &Coupon,
    order_total: Decimal,
    now: DateTime<Utc>,
) -> Result<CouponQuote, CouponError> {
    if !coupon.active {
        return Err(CouponError::Inactive);
    }
    if let Some(expires_at) = coupon.expires_at
        && now >= expires_at
    {
        return Err(CouponError::Expired);
    }
    if let Some(limit) = coupon.usage_limit
        && coupon.times_used >= limit
    {
        return Err(CouponError::Exhausted);
    }
    if order_total < coupon.min_order_total {
        return Err(CouponError::BelowMinimum {
            min: coupon.min_order_total,
        });
    }

    let discount = coupon.kind.discount(coupon.value, order_total);
    Ok(CouponQuote {
        code: coupon.code.clone(),
        discount,
        total_after: order_total - discount,
    })
}

/// Validate a coupon code against an order total.
///
/// Read-only: applying the coupon (and counting the use) happens at
/// checkout.
///
/// # Errors
///
/// Returns `CouponError::Unknown` for an unknown code, otherwise the
/// first rule the coupon fails.
pub async fn validate(
    pool: &PgPool,
    code: &str,
    order_total: Decimal,
) -> Result<CouponQuote, CouponError> {
    let coupon = coupons::get_by_code(pool, code)
        .await?
        .ok_or(CouponError::Unknown)?;

    evaluate(&coupon, order_total, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ondine_core::{CouponId, CouponKind};

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal")
    }

    fn coupon() -> Coupon {
        Coupon {
            id: CouponId::new(1),
            code: "SPRING15".to_owned(),
            kind: CouponKind::Percent,
            value: dec("15"),
            min_order_total: dec("30"),
            expires_at: Some("2025-06-01T00:00:00Z".parse().expect("timestamp")),
            usage_limit: Some(100),
            times_used: 0,
            active: true,
        }
    }

    fn before_expiry() -> DateTime<Utc> {
        "2025-05-01T00:00:00Z".parse().expect("timestamp")
    }

    #[test]
    fn applies_percent_discount() {
        let quote = evaluate(&coupon(), dec("54.99"), before_expiry()).expect("valid");
        // 15% of 54.99 = 8.2485 -> 8.25
        assert_eq!(quote.discount, dec("8.25"));
        assert_eq!(quote.total_after, dec("46.74"));
    }

    #[test]
    fn rejects_inactive_coupon() {
        let mut c = coupon();
        c.active = false;
        assert!(matches!(
            evaluate(&c, dec("50"), before_expiry()),
            Err(CouponError::Inactive)
        ));
    }

    #[test]
    fn rejects_expired_coupon() {
        let after: DateTime<Utc> = "2025-07-01T00:00:00Z".parse().expect("timestamp");
        assert!(matches!(
            evaluate(&coupon(), dec("50"), after),
            Err(CouponError::Expired)
        ));
    }

    #[test]
    fn rejects_exhausted_coupon() {
        let mut c = coupon();
        c.times_used = 100;
        assert!(matches!(
            evaluate(&c, dec("50"), before_expiry()),
            Err(CouponError::Exhausted)
        ));
    }

    #[test]
    fn rejects_order_below_minimum() {
        let result = evaluate(&coupon(), dec("29.99"), before_expiry());
        assert!(matches!(result, Err(CouponError::BelowMinimum { min }) if min == dec("30")));
    }

    #[test]
    fn fixed_discount_is_capped_at_order_total() {
        let mut c = coupon();
        c.kind = CouponKind::Fixed;
        c.value = dec("50");
        c.min_order_total = Decimal::ZERO;

        let quote = evaluate(&c, dec("32.50"), before_expiry()).expect("valid");
        assert_eq!(quote.discount, dec("32.50"));
        assert_eq!(quote.total_after, Decimal::ZERO);
    }
}
