//! Status enums shared between the storefront and the back office.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::money::round_to_cents;

/// Payment status of an order's product total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_payment_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum OrderPaymentStatus {
    #[default]
    Pending,
    Paid,
    Refunded,
}

/// Lifecycle status of a return request.
///
/// ```text
/// requested ──► approved ──► received ──► refunded
///     └───────► rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "return_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum ReturnStatus {
    Requested,
    Approved,
    Rejected,
    Received,
    Refunded,
}

/// A return-status change that the lifecycle does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal return transition: {from:?} -> {to:?}")]
pub struct InvalidReturnTransition {
    pub from: ReturnStatus,
    pub to: ReturnStatus,
}

impl ReturnStatus {
    /// Whether the lifecycle permits moving from `self` to `next`.
    #[must_use]
    pub const fn can_transition(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Requested, Self::Approved)
                | (Self::Requested, Self::Rejected)
                | (Self::Approved, Self::Received)
                | (Self::Received, Self::Refunded)
        )
    }

    /// Validate a status change.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidReturnTransition`] when the move is not in the
    /// transition table above.
    pub const fn transition(self, next: Self) -> Result<Self, InvalidReturnTransition> {
        if self.can_transition(next) {
            Ok(next)
        } else {
            Err(InvalidReturnTransition {
                from: self,
                to: next,
            })
        }
    }
}

/// Lifecycle status of a gift card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "gift_card_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum GiftCardStatus {
    Active,
    Redeemed,
    Void,
}

/// Publication status of a news post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "post_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

/// Kind of discount a coupon grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "coupon_kind", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum CouponKind {
    /// `value` is a percentage of the order total (0-100).
    Percent,
    /// `value` is an absolute amount.
    Fixed,
}

impl CouponKind {
    /// Compute the discount this coupon grants on `order_total`.
    ///
    /// Percent discounts are rounded to cents; the result never exceeds
    /// the order total.
    #[must_use]
    pub fn discount(self, value: Decimal, order_total: Decimal) -> Decimal {
        let raw = match self {
            Self::Percent => round_to_cents(order_total * value / Decimal::from(100)),
            Self::Fixed => value,
        };
        raw.min(order_total)
    }
}

/// Phase of a live-shopping stream, derived from its schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamPhase {
    Upcoming,
    Live,
    Ended,
}

impl StreamPhase {
    /// Derive the phase from the scheduled window and the current time.
    #[must_use]
    pub fn at(
        starts_at: chrono::DateTime<chrono::Utc>,
        ends_at: chrono::DateTime<chrono::Utc>,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        if now < starts_at {
            Self::Upcoming
        } else if now < ends_at {
            Self::Live
        } else {
            Self::Ended
        }
    }
}

/// Back-office role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "admin_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access including admin-user management.
    SuperAdmin,
    /// Full access to store management features.
    Admin,
    /// Read-only access to store data.
    Viewer,
}

impl AdminRole {
    /// Whether this role may perform mutating operations.
    #[must_use]
    pub const fn can_write(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::Admin => write!(f, "admin"),
            Self::Viewer => write!(f, "viewer"),
        }
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "viewer" => Ok(Self::Viewer),
            _ => Err(format!("invalid admin role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal")
    }

    #[test]
    fn percent_discount_rounds_to_cents() {
        // 15% of 19.99 is 2.9985 -> 3.00
        let discount = CouponKind::Percent.discount(dec("15"), dec("19.99"));
        assert_eq!(discount, dec("3.00"));
    }

    #[test]
    fn fixed_discount_never_exceeds_total() {
        let discount = CouponKind::Fixed.discount(dec("20"), dec("12.50"));
        assert_eq!(discount, dec("12.50"));
    }

    #[test]
    fn full_percent_discount_equals_total() {
        let discount = CouponKind::Percent.discount(dec("100"), dec("54.99"));
        assert_eq!(discount, dec("54.99"));
    }

    #[test]
    fn return_lifecycle_rejects_backward_moves() {
        use ReturnStatus::{Approved, Received, Refunded, Rejected, Requested};

        assert!(Requested.transition(Approved).is_ok());
        assert!(Requested.transition(Rejected).is_ok());
        assert!(Approved.transition(Received).is_ok());
        assert!(Received.transition(Refunded).is_ok());

        for (from, to) in [
            (Approved, Requested),
            (Rejected, Approved),
            (Refunded, Requested),
            (Requested, Refunded),
            (Received, Approved),
        ] {
            assert!(from.transition(to).is_err(), "{from:?} -> {to:?}");
        }
    }

    #[test]
    fn stream_phase_follows_the_schedule() {
        let starts: DateTime<Utc> = "2025-03-01T18:00:00Z".parse().expect("timestamp");
        let ends: DateTime<Utc> = "2025-03-01T19:00:00Z".parse().expect("timestamp");

        let before = "2025-03-01T17:59:00Z".parse().expect("timestamp");
        let during = "2025-03-01T18:30:00Z".parse().expect("timestamp");
        let after = "2025-03-01T19:00:00Z".parse().expect("timestamp");

        assert_eq!(StreamPhase::at(starts, ends, before), StreamPhase::Upcoming);
        assert_eq!(StreamPhase::at(starts, ends, during), StreamPhase::Live);
        assert_eq!(StreamPhase::at(starts, ends, after), StreamPhase::Ended);
    }

    #[test]
    fn viewer_role_cannot_write() {
        assert!(AdminRole::SuperAdmin.can_write());
        assert!(AdminRole::Admin.can_write());
        assert!(!AdminRole::Viewer.can_write());
    }

    #[test]
    fn admin_role_round_trips_through_strings() {
        for role in [AdminRole::SuperAdmin, AdminRole::Admin, AdminRole::Viewer] {
            let parsed: AdminRole = role.to_string().parse().expect("round trip");
            assert_eq!(parsed, role);
        }
    }
}
