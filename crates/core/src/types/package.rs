//! Grouped-shipping package lifecycle.
//!
//! A customer keeps at most one package "open" at a time; orders placed
//! while it is open ship together once it closes. The lifecycle is a
//! three-state machine:
//!
//! ```text
//! active ──► closed ──► shipped
//! ```
//!
//! Status values are data, but transitions are not: every status write in
//! the service crates goes through [`PackageStatus::transition`] (and a
//! matching conditional `UPDATE`), so an illegal move such as
//! `shipped -> active` is rejected with a typed error instead of silently
//! overwriting a row.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long a package stays open: exactly five days (432 000 seconds),
/// independent of the client's timezone.
pub const OPEN_WINDOW_SECONDS: i64 = 5 * 24 * 60 * 60;

/// Compute the scheduled close time for a package opened at `opened_at`.
#[must_use]
pub fn closing_time(opened_at: DateTime<Utc>) -> DateTime<Utc> {
    opened_at + Duration::seconds(OPEN_WINDOW_SECONDS)
}

/// Lifecycle status of a grouped-shipping package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "package_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum PackageStatus {
    /// Accepting orders until `closes_at`.
    Active,
    /// Sealed, waiting for dispatch.
    Closed,
    /// Handed to the carrier.
    Shipped,
}

/// A status change that the lifecycle does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal package transition: {from} -> {to}")]
pub struct InvalidPackageTransition {
    /// Status the package was in.
    pub from: PackageStatus,
    /// Status the caller tried to move to.
    pub to: PackageStatus,
}

impl PackageStatus {
    /// Whether the lifecycle permits moving from `self` to `next`.
    #[must_use]
    pub const fn can_transition(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Closed) | (Self::Closed, Self::Shipped)
        )
    }

    /// Validate a status change.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPackageTransition`] when the move is not
    /// `active -> closed` or `closed -> shipped`.
    pub const fn transition(self, next: Self) -> Result<Self, InvalidPackageTransition> {
        if self.can_transition(next) {
            Ok(next)
        } else {
            Err(InvalidPackageTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Shipped)
    }
}

impl core::fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::Closed => "closed",
            Self::Shipped => "shipped",
        };
        f.write_str(s)
    }
}

impl core::str::FromStr for PackageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            "shipped" => Ok(Self::Shipped),
            _ => Err(format!("invalid package status: {s}")),
        }
    }
}

/// Time left until a deadline, decomposed for display.
///
/// Whole days, hours and minutes, floored, clamped to zero once the
/// deadline has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

impl TimeRemaining {
    /// Compute the time remaining between `now` and `deadline`.
    #[must_use]
    pub fn until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let secs = (deadline - now).num_seconds().max(0);
        Self {
            days: secs / 86_400,
            hours: secs % 86_400 / 3_600,
            minutes: secs % 3_600 / 60,
        }
    }

    /// Whether the deadline has passed (to the minute).
    #[must_use]
    pub const fn is_elapsed(self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().expect("timestamp")
    }

    #[test]
    fn close_window_is_exactly_five_days() {
        let opened = utc("2024-01-01T00:00:00Z");
        let closes = closing_time(opened);
        assert_eq!(closes, utc("2024-01-06T00:00:00Z"));
        assert_eq!((closes - opened).num_seconds(), 432_000);
    }

    #[test]
    fn close_window_ignores_client_timezone() {
        // The same instant expressed in another offset closes at the same
        // instant.
        let opened = utc("2024-06-15T22:30:00Z");
        let same_instant = chrono::FixedOffset::east_opt(2 * 3600)
            .expect("offset")
            .with_ymd_and_hms(2024, 6, 16, 0, 30, 0)
            .single()
            .expect("datetime")
            .with_timezone(&Utc);
        assert_eq!(closing_time(opened), closing_time(same_instant));
    }

    #[test]
    fn time_remaining_decomposes_to_days_hours_minutes() {
        let closes = utc("2024-01-06T00:00:00Z");
        let now = utc("2024-01-03T12:00:00Z");
        let remaining = TimeRemaining::until(closes, now);
        assert_eq!(
            remaining,
            TimeRemaining {
                days: 2,
                hours: 12,
                minutes: 0
            }
        );
        assert!(!remaining.is_elapsed());
    }

    #[test]
    fn time_remaining_floors_partial_minutes() {
        let closes = utc("2024-01-01T00:01:59Z");
        let now = utc("2024-01-01T00:00:00Z");
        assert_eq!(
            TimeRemaining::until(closes, now),
            TimeRemaining {
                days: 0,
                hours: 0,
                minutes: 1
            }
        );
    }

    #[test]
    fn time_remaining_clamps_after_deadline() {
        let closes = utc("2024-01-01T00:00:00Z");
        let now = utc("2024-02-01T00:00:00Z");
        let remaining = TimeRemaining::until(closes, now);
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
    fn lifecycle_allows_only_forward_moves() {
        use PackageStatus::{Active, Closed, Shipped};

        assert_eq!(Active.transition(Closed), Ok(Closed));
        assert_eq!(Closed.transition(Shipped), Ok(Shipped));

        for (from, to) in [
            (Active, Shipped),
            (Active, Active),
            (Closed, Active),
            (Closed, Closed),
            (Shipped, Active),
            (Shipped, Closed),
            (Shipped, Shipped),
        ] {
            assert_eq!(
                from.transition(to),
                Err(InvalidPackageTransition { from, to }),
                "{from} -> {to} must be rejected"
            );
        }
    }

    #[test]
    fn shipped_is_the_only_terminal_status() {
        assert!(PackageStatus::Shipped.is_terminal());
        assert!(!PackageStatus::Active.is_terminal());
        assert!(!PackageStatus::Closed.is_terminal());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            PackageStatus::Active,
            PackageStatus::Closed,
            PackageStatus::Shipped,
        ] {
            let parsed: PackageStatus = status.to_string().parse().expect("round trip");
            assert_eq!(parsed, status);
        }
        assert!("open".parse::<PackageStatus>().is_err());
    }
}
