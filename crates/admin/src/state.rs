//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::services::EmailService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds two pools: the admin database for
/// identities/sessions and the store database for commerce data.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    admin_pool: PgPool,
    store_pool: PgPool,
    email: Option<EmailService>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: AdminConfig,
        admin_pool: PgPool,
        store_pool: PgPool,
        email: Option<EmailService>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                admin_pool,
                store_pool,
                email,
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// The admin database pool (identities, sessions).
    #[must_use]
    pub fn admin_pool(&self) -> &PgPool {
        &self.inner.admin_pool
    }

    /// The store database pool (commerce data).
    #[must_use]
    pub fn store_pool(&self) -> &PgPool {
        &self.inner.store_pool
    }

    /// The email service, when SMTP is configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }
}
