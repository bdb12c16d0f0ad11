//! Grouped-shipping package lifecycle service.
//!
//! Mediates between the HTTP layer and the package repository for the
//! single-active-package concept: load the caller's active package with
//! its countdown and order summary, open a new one, add orders to it,
//! and close it for dispatch.
//!
//! Input validation happens before any repository call, status changes
//! go through [`PackageStatus::transition`], and the caller's identity
//! is an explicit parameter on every operation.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use ondine_core::{
    AddressId, InvalidPackageTransition, OrderId, OrderPaymentStatus, PackageStatus,
    ShippingMethodId, TimeRemaining, UserId,
};

use crate::db::packages::{LinkedOrder, OpenPackage};
use crate::db::{RepositoryError, addresses, orders, packages, shipping_methods, wallet};

/// Errors from package lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    /// Request input failed validation; nothing was written.
    #[error("{0}")]
    Validation(&'static str),

    /// The referenced entity does not exist (for this caller).
    #[error("{0}")]
    NotFound(&'static str),

    /// The operation conflicts with the package's current state.
    #[error("{0}")]
    Conflict(&'static str),

    /// The requested status change is illegal.
    #[error(transparent)]
    Transition(#[from] InvalidPackageTransition),

    /// Underlying repository error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Request body for opening a package.
///
/// Both ids are optional at the wire level so that a missing selection is
/// reported as a validation error rather than a deserialization failure.
#[derive(Debug, Default, serde::Deserialize)]
pub struct CreatePackageRequest {
    pub address_id: Option<AddressId>,
    pub shipping_method_id: Option<ShippingMethodId>,
    /// Settle the shipping fee from the wallet immediately instead of at
    /// close time.
    #[serde(default)]
    pub pay_now: bool,
}

/// Aggregate figures for the orders in a package.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PackageSummary {
    pub order_count: usize,
    pub paid_count: usize,
    pub unpaid_count: usize,
    /// Sum of line-item quantities across all linked orders.
    pub item_count: i64,
    /// Sum of the linked orders' product totals.
    pub orders_total: Decimal,
    pub shipping_fee_paid: bool,
}

impl PackageSummary {
    /// Compute the summary from the linked orders.
    #[must_use]
    pub fn compute(orders: &[LinkedOrder], shipping_cost_paid: Decimal) -> Self {
        let paid_count = orders.iter().filter(|o| o.is_paid).count();
        Self {
            order_count: orders.len(),
            paid_count,
            unpaid_count: orders.len() - paid_count,
            item_count: orders.iter().map(|o| o.item_count).sum(),
            orders_total: orders.iter().map(|o| o.total).sum(),
            shipping_fee_paid: !shipping_cost_paid.is_zero(),
        }
    }
}

/// The caller's active package, shaped for display.
#[derive(Debug, serde::Serialize)]
pub struct ActivePackageView {
    #[serde(flatten)]
    pub package: OpenPackage,
    pub time_remaining: TimeRemaining,
    pub orders: Vec<LinkedOrder>,
    pub summary: PackageSummary,
}

/// Validate a create request before touching the repository.
///
/// # Errors
///
/// Returns `PackageError::Validation` when either selection is missing.
pub fn validate_create(
    req: &CreatePackageRequest,
) -> Result<(AddressId, ShippingMethodId), PackageError> {
    let address_id = req
        .address_id
        .ok_or(PackageError::Validation("a shipping address is required"))?;
    let shipping_method_id = req
        .shipping_method_id
        .ok_or(PackageError::Validation("a shipping method is required"))?;
    Ok((address_id, shipping_method_id))
}

/// Package lifecycle service.
pub struct PackageService<'a> {
    pool: &'a PgPool,
}

impl<'a> PackageService<'a> {
    /// Create a new package service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load the caller's active package, if any.
    ///
    /// Loading is read-only and idempotent; no active package is a
    /// normal state.
    ///
    /// # Errors
    ///
    /// Returns error if a repository call fails.
    pub async fn load_active(
        &self,
        user_id: UserId,
    ) -> Result<Option<ActivePackageView>, PackageError> {
        let Some(package) = packages::get_active(self.pool, user_id).await? else {
            return Ok(None);
        };

        let orders = packages::linked_orders(self.pool, package.id).await?;
        Ok(Some(Self::view(package, orders)))
    }

    /// Open a new package for the caller.
    ///
    /// # Errors
    ///
    /// Returns `PackageError::Validation` before any write when a
    /// selection is missing or doesn't belong to the caller.
    /// Returns `PackageError::Conflict` when an active package already
    /// exists or (with `pay_now`) the wallet can't cover the fee.
    #[instrument(skip(self, req), fields(user = %user_id))]
    pub async fn create(
        &self,
        user_id: UserId,
        req: CreatePackageRequest,
    ) -> Result<ActivePackageView, PackageError> {
        let (address_id, shipping_method_id) = validate_create(&req)?;

        let address = addresses::get_owned(self.pool, user_id, address_id)
            .await?
            .ok_or(PackageError::Validation("unknown shipping address"))?;

        let method = shipping_methods::get_active(self.pool, shipping_method_id)
            .await?
            .ok_or(PackageError::Validation("unknown shipping method"))?;

        if req.pay_now {
            debit_shipping_fee(self.pool, user_id, method.price).await?;
        }

        let mut package =
            match packages::create(self.pool, user_id, address.id, method.id).await {
                Ok(package) => package,
                Err(e) => {
                    // The fee was taken but the package was not opened;
                    // put the money back before reporting the failure.
                    if req.pay_now
                        && let Err(refund_err) = wallet::credit(
                            self.pool,
                            user_id,
                            method.price,
                            "shipping fee refunded",
                            None,
                        )
                        .await
                    {
                        warn!(error = %refund_err, "failed to refund shipping fee");
                    }
                    return Err(e.into());
                }
            };

        if req.pay_now {
            packages::record_shipping_payment(self.pool, package.id, method.price).await?;
            package.shipping_cost_paid = method.price;
        }

        info!(package = %package.id, closes_at = %package.closes_at, "package opened");

        Ok(Self::view(package, Vec::new()))
    }

    /// Close the caller's active package (`active -> closed`).
    ///
    /// Settles the shipping fee from the wallet first when it is still
    /// outstanding. Only `status` and `closed_at` change on the package
    /// row; order links are untouched.
    ///
    /// # Errors
    ///
    /// Returns `PackageError::NotFound` when the caller never had a
    /// package, and `PackageError::Conflict` when the latest one is
    /// already closed or shipped (e.g. the expiry sweep won the race).
    #[instrument(skip(self), fields(user = %user_id))]
    pub async fn close(&self, user_id: UserId) -> Result<OpenPackage, PackageError> {
        let Some(active) = packages::get_active(self.pool, user_id).await? else {
            return Err(self.classify_missing_active(user_id).await?);
        };

        // Always Ok for an active row; keeps every status write behind
        // the transition table.
        active.status.transition(PackageStatus::Closed)?;

        if active.shipping_cost_paid.is_zero() {
            let method = shipping_methods::get(self.pool, active.shipping_method_id)
                .await?
                .ok_or(PackageError::NotFound("shipping method no longer exists"))?;
            debit_shipping_fee(self.pool, user_id, method.price).await?;
            packages::record_shipping_payment(self.pool, active.id, method.price).await?;
        }

        match packages::close(self.pool, user_id).await? {
            Some(closed) => {
                info!(package = %closed.id, "package closed for dispatch");
                Ok(closed)
            }
            // Someone else closed it between our read and our write.
            None => Err(self.classify_missing_active(user_id).await?),
        }
    }

    /// Add a caller-owned order to the caller's active package.
    ///
    /// # Errors
    ///
    /// Returns `PackageError::NotFound` when there is no active package
    /// or the order isn't the caller's; `PackageError::Conflict` when
    /// the order is already in a package.
    #[instrument(skip(self), fields(user = %user_id, order = %order_id))]
    pub async fn add_order(&self, user_id: UserId, order_id: OrderId) -> Result<(), PackageError> {
        let active = packages::get_active(self.pool, user_id)
            .await?
            .ok_or(PackageError::NotFound("no active package"))?;

        let order = orders::get_owned(self.pool, user_id, order_id)
            .await?
            .ok_or(PackageError::NotFound("no such order"))?;

        let is_paid = order.payment_status == OrderPaymentStatus::Paid;
        packages::add_order(self.pool, active.id, order.id, is_paid).await?;

        Ok(())
    }

    /// Decide what to report when no active package was found.
    async fn classify_missing_active(&self, user_id: UserId) -> Result<PackageError, PackageError> {
        let latest = packages::get_latest(self.pool, user_id).await?;
        Ok(match latest.map(|p| p.status) {
            Some(PackageStatus::Closed) => PackageError::Conflict("package already closed"),
            Some(PackageStatus::Shipped) => PackageError::Conflict("package already shipped"),
            _ => PackageError::NotFound("no active package"),
        })
    }

    fn view(package: OpenPackage, orders: Vec<LinkedOrder>) -> ActivePackageView {
        let time_remaining = TimeRemaining::until(package.closes_at, chrono::Utc::now());
        let summary = PackageSummary::compute(&orders, package.shipping_cost_paid);
        ActivePackageView {
            time_remaining,
            summary,
            orders,
            package,
        }
    }
}

/// Debit the shipping fee, turning "insufficient funds" into a
/// package-level conflict.
async fn debit_shipping_fee(
    pool: &PgPool,
    user_id: UserId,
    amount: Decimal,
) -> Result<(), PackageError> {
    wallet::debit(pool, user_id, amount, "package shipping fee", None)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => {
                PackageError::Conflict("insufficient wallet balance for the shipping fee")
            }
            other => PackageError::Repository(other),
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal")
    }

    fn linked(order_id: i32, total: &str, is_paid: bool, item_count: i64) -> LinkedOrder {
        LinkedOrder {
            order_id: OrderId::new(order_id),
            number: format!("MO-{order_id:05}"),
            total: dec(total),
            is_paid,
            added_at: Utc::now(),
            item_count,
        }
    }

    #[test]
    fn create_request_without_address_fails_validation() {
        let req = CreatePackageRequest {
            address_id: None,
            shipping_method_id: Some(ShippingMethodId::new(1)),
            pay_now: false,
        };
        assert!(matches!(
            validate_create(&req),
            Err(PackageError::Validation(_))
        ));
    }

    #[test]
    fn create_request_without_shipping_method_fails_validation() {
        let req = CreatePackageRequest {
            address_id: Some(AddressId::new(1)),
            shipping_method_id: None,
            pay_now: true,
        };
        assert!(matches!(
            validate_create(&req),
            Err(PackageError::Validation(_))
        ));
    }

    #[test]
    fn create_request_with_both_selections_passes() {
        let req = CreatePackageRequest {
            address_id: Some(AddressId::new(3)),
            shipping_method_id: Some(ShippingMethodId::new(7)),
            pay_now: false,
        };
        let (address_id, method_id) = validate_create(&req).expect("valid");
        assert_eq!(address_id, AddressId::new(3));
        assert_eq!(method_id, ShippingMethodId::new(7));
    }

    #[test]
    fn summary_aggregates_totals_and_item_counts() {
        let orders = vec![
            linked(1, "19.99", true, 2),
            linked(2, "35.00", false, 3),
        ];
        let summary = PackageSummary::compute(&orders, Decimal::ZERO);

        assert_eq!(summary.order_count, 2);
        assert_eq!(summary.paid_count, 1);
        assert_eq!(summary.unpaid_count, 1);
        assert_eq!(summary.orders_total, dec("54.99"));
        assert_eq!(summary.item_count, 5);
        assert!(!summary.shipping_fee_paid);
    }

    #[test]
    fn summary_of_empty_package_is_zero() {
        let summary = PackageSummary::compute(&[], dec("4.90"));
        assert_eq!(summary.order_count, 0);
        assert_eq!(summary.orders_total, Decimal::ZERO);
        assert_eq!(summary.item_count, 0);
        assert!(summary.shipping_fee_paid);
    }
}
