//! Database operations for shipping methods.

use rust_decimal::Decimal;
use sqlx::PgPool;

use ondine_core::ShippingMethodId;

use super::RepositoryError;

/// A shipping method offered at package creation.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct ShippingMethod {
    pub id: ShippingMethodId,
    pub name: String,
    pub price: Decimal,
    /// Human-readable delivery window, e.g. "3-5 business days".
    pub delivery_window: String,
    #[serde(skip)]
    pub active: bool,
}

/// List the currently offered shipping methods, cheapest first.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn list_active(pool: &PgPool) -> Result<Vec<ShippingMethod>, RepositoryError> {
    let methods = sqlx::query_as::<_, ShippingMethod>(
        r"
        SELECT id, name, price, delivery_window, active
        FROM storefront.shipping_method
        WHERE active
        ORDER BY price ASC
        ",
    )
    .fetch_all(pool)
    .await?;

    Ok(methods)
}

/// Get a shipping method regardless of its active flag.
///
/// Packages keep charging the method they were opened with even after it
/// is withdrawn from the creation list.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn get(
    pool: &PgPool,
    id: ShippingMethodId,
) -> Result<Option<ShippingMethod>, RepositoryError> {
    let method = sqlx::query_as::<_, ShippingMethod>(
        r"
        SELECT id, name, price, delivery_window, active
        FROM storefront.shipping_method
        WHERE id = $1
        ",
    )
    .bind(id.as_i32())
    .fetch_optional(pool)
    .await?;

    Ok(method)
}

/// Get a shipping method only if it is still offered.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn get_active(
    pool: &PgPool,
    id: ShippingMethodId,
) -> Result<Option<ShippingMethod>, RepositoryError> {
    let method = sqlx::query_as::<_, ShippingMethod>(
        r"
        SELECT id, name, price, delivery_window, active
        FROM storefront.shipping_method
        WHERE id = $1 AND active
        ",
    )
    .bind(id.as_i32())
    .fetch_optional(pool)
    .await?;

    Ok(method)
}
