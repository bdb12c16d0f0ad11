//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::shipping_methods::ShippingMethod;

/// How long the shipping-method list may be served from cache.
const SHIPPING_METHOD_TTL: Duration = Duration::from_secs(300);

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    shipping_methods: Cache<&'static str, Arc<Vec<ShippingMethod>>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let shipping_methods = Cache::builder()
            .max_capacity(1)
            .time_to_live(SHIPPING_METHOD_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                shipping_methods,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The active shipping methods, served from a short-lived cache.
    ///
    /// # Errors
    ///
    /// Returns error if the list has to be reloaded and the query fails.
    pub async fn shipping_methods(
        &self,
    ) -> Result<Arc<Vec<ShippingMethod>>, crate::db::RepositoryError> {
        if let Some(methods) = self.inner.shipping_methods.get("active").await {
            return Ok(methods);
        }

        let methods = Arc::new(crate::db::shipping_methods::list_active(&self.inner.pool).await?);
        self.inner
            .shipping_methods
            .insert("active", Arc::clone(&methods))
            .await;

        Ok(methods)
    }
}
