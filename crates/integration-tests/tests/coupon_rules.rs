//! Integration tests for coupon validation rules.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use ondine_core::{CouponId, CouponKind};
use ondine_storefront::db::coupons::Coupon;
use ondine_storefront::services::coupons::{CouponError, evaluate};

fn dec(s: &str) -> Decimal {
    s.parse().expect("decimal")
}

fn at(s: &str) -> DateTime<Utc> {
    s.parse().expect("timestamp")
}

fn percent_coupon() -> Coupon {
    Coupon {
        id: CouponId::new(1),
        code: "SOLDES20".to_owned(),
        kind: CouponKind::Percent,
        value: dec("20"),
        min_order_total: dec("50"),
        expires_at: Some(at("2025-02-01T00:00:00Z")),
        usage_limit: Some(500),
        times_used: 499,
        active: true,
    }
}

#[test]
fn test_percent_discount_rounds_to_cents() {
    // 20% of 54.99 = 10.998 -> 11.00
    let quote = evaluate(&percent_coupon(), dec("54.99"), at("2025-01-15T00:00:00Z"))
        .expect("valid coupon");

    assert_eq!(quote.discount, dec("11.00"));
    assert_eq!(quote.total_after, dec("43.99"));
}

#[test]
fn test_last_use_is_still_accepted() {
    // times_used 499 of 500: one use left.
    let quote = evaluate(&percent_coupon(), dec("60"), at("2025-01-15T00:00:00Z"));
    assert!(quote.is_ok());
}

#[test]
fn test_exhausted_coupon_is_rejected() {
    let mut coupon = percent_coupon();
    coupon.times_used = 500;

    let result = evaluate(&coupon, dec("60"), at("2025-01-15T00:00:00Z"));
    assert!(matches!(result, Err(CouponError::Exhausted)));
}

#[test]
fn test_expiry_boundary_is_exclusive() {
    // Valid one second before expiry, rejected exactly at it.
    let coupon = percent_coupon();

    assert!(evaluate(&coupon, dec("60"), at("2025-01-31T23:59:59Z")).is_ok());
    assert!(matches!(
        evaluate(&coupon, dec("60"), at("2025-02-01T00:00:00Z")),
        Err(CouponError::Expired)
    ));
}

#[test]
fn test_minimum_order_total_boundary_is_inclusive() {
    let coupon = percent_coupon();
    let now = at("2025-01-15T00:00:00Z");

    assert!(evaluate(&coupon, dec("50"), now).is_ok());
    assert!(matches!(
        evaluate(&coupon, dec("49.99"), now),
        Err(CouponError::BelowMinimum { .. })
    ));
}

#[test]
fn test_fixed_coupon_never_exceeds_order_total() {
    let coupon = Coupon {
        id: CouponId::new(2),
        code: "MERCI15".to_owned(),
        kind: CouponKind::Fixed,
        value: dec("15"),
        min_order_total: Decimal::ZERO,
        expires_at: None,
        usage_limit: None,
        times_used: 0,
        active: true,
    };

    let quote = evaluate(&coupon, dec("12.00"), at("2025-01-15T00:00:00Z")).expect("valid");
    assert_eq!(quote.discount, dec("12.00"));
    assert_eq!(quote.total_after, Decimal::ZERO);
}
