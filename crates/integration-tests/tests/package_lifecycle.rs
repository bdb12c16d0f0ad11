//! Integration tests for the grouped-shipping package lifecycle.
//!
//! These verify the lifecycle rules and display math shared between the
//! storefront and the back office, without requiring a database.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use ondine_core::{
    OPEN_WINDOW_SECONDS, OrderId, PackageStatus, TimeRemaining, closing_time,
};
use ondine_storefront::db::packages::LinkedOrder;
use ondine_storefront::services::packages::{
    CreatePackageRequest, PackageError, PackageSummary, validate_create,
};

fn utc(s: &str) -> DateTime<Utc> {
    s.parse().expect("timestamp")
}

fn dec(s: &str) -> Decimal {
    s.parse().expect("decimal")
}

// =============================================================================
// Close window
// =============================================================================

#[test]
fn test_close_window_is_five_days_to_the_second() {
    assert_eq!(OPEN_WINDOW_SECONDS, 432_000);

    let opened = utc("2024-01-01T00:00:00Z");
    assert_eq!(closing_time(opened), utc("2024-01-06T00:00:00Z"));
}

#[test]
fn test_countdown_scenario_from_mid_window() {
    // Opened 2024-01-01, queried 2024-01-03 at noon: 2 days 12 hours left.
    let closes = closing_time(utc("2024-01-01T00:00:00Z"));
    let remaining = TimeRemaining::until(closes, utc("2024-01-03T12:00:00Z"));

    assert_eq!(remaining.days, 2);
    assert_eq!(remaining.hours, 12);
    assert_eq!(remaining.minutes, 0);
}

#[test]
fn test_countdown_never_goes_negative() {
    let closes = utc("2024-01-06T00:00:00Z");
    let remaining = TimeRemaining::until(closes, utc("2024-03-01T09:30:00Z"));

    assert_eq!(
        remaining,
        TimeRemaining {
            days: 0,
            hours: 0,
            minutes: 0
        }
    );
    assert!(remaining.is_elapsed());
}

#[test]
fn test_countdown_is_deterministic_for_equal_inputs() {
    // Re-loading without mutation yields the same countdown.
    let closes = utc("2024-01-06T00:00:00Z");
    let now = utc("2024-01-04T07:45:00Z");

    assert_eq!(
        TimeRemaining::until(closes, now),
        TimeRemaining::until(closes, now)
    );
}

// =============================================================================
// Status lifecycle
// =============================================================================

/// Valid transitions:
/// active -> closed (manual close or expiry sweep)
/// closed -> shipped (dispatch)
#[test]
fn test_valid_lifecycle_transitions() {
    assert!(
        PackageStatus::Active
            .transition(PackageStatus::Closed)
            .is_ok()
    );
    assert!(
        PackageStatus::Closed
            .transition(PackageStatus::Shipped)
            .is_ok()
    );
}

/// Everything else must be rejected, including re-opening a shipped
/// package and skipping the closed state.
#[test]
fn test_invalid_lifecycle_transitions_are_rejected() {
    let all = [
        PackageStatus::Active,
        PackageStatus::Closed,
        PackageStatus::Shipped,
    ];

    for from in all {
        for to in all {
            let legal = matches!(
                (from, to),
                (PackageStatus::Active, PackageStatus::Closed)
                    | (PackageStatus::Closed, PackageStatus::Shipped)
            );
            assert_eq!(
                from.transition(to).is_ok(),
                legal,
                "transition {from} -> {to}"
            );
        }
    }
}

#[test]
fn test_transition_error_reports_both_ends() {
    let err = PackageStatus::Shipped
        .transition(PackageStatus::Active)
        .unwrap_err();

    assert_eq!(err.from, PackageStatus::Shipped);
    assert_eq!(err.to, PackageStatus::Active);
    assert_eq!(
        err.to_string(),
        "illegal package transition: shipped -> active"
    );
}

// =============================================================================
// Creation validation
// =============================================================================

#[test]
fn test_creation_requires_both_selections() {
    let missing_both = CreatePackageRequest::default();
    assert!(matches!(
        validate_create(&missing_both),
        Err(PackageError::Validation(_))
    ));

    let missing_method = CreatePackageRequest {
        address_id: Some(ondine_core::AddressId::new(1)),
        ..CreatePackageRequest::default()
    };
    assert!(matches!(
        validate_create(&missing_method),
        Err(PackageError::Validation(_))
    ));
}

// =============================================================================
// Order summary
// =============================================================================

fn linked(order_id: i32, total: &str, is_paid: bool, item_count: i64) -> LinkedOrder {
    LinkedOrder {
        order_id: OrderId::new(order_id),
        number: format!("MO-{order_id:05}"),
        total: dec(total),
        is_paid,
        added_at: utc("2024-01-02T10:00:00Z"),
        item_count,
    }
}

#[test]
fn test_summary_totals_two_orders() {
    // 19.99 + 35.00 must display as 54.99, items as the quantity sum.
    let orders = [linked(1, "19.99", true, 2), linked(2, "35.00", false, 3)];
    let summary = PackageSummary::compute(&orders, Decimal::ZERO);

    assert_eq!(summary.orders_total, dec("54.99"));
    assert_eq!(summary.item_count, 5);
    assert_eq!(summary.order_count, 2);
    assert_eq!(summary.paid_count, 1);
    assert_eq!(summary.unpaid_count, 1);
}

#[test]
fn test_summary_reflects_shipping_fee_settlement() {
    let orders = [linked(1, "19.99", true, 1)];

    let unsettled = PackageSummary::compute(&orders, Decimal::ZERO);
    assert!(!unsettled.shipping_fee_paid);

    let settled = PackageSummary::compute(&orders, dec("4.90"));
    assert!(settled.shipping_fee_paid);
}
