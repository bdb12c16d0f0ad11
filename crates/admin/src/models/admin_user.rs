//! Admin user models and session keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ondine_core::{AdminRole, AdminUserId, Email};

/// A back-office user.
#[derive(Debug, Clone, Serialize)]
pub struct AdminUser {
    pub id: AdminUserId,
    pub email: Email,
    pub name: String,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The authenticated admin identity stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: AdminUserId,
    pub email: String,
    pub name: String,
    pub role: AdminRole,
}

impl CurrentAdmin {
    /// Build the session identity from a full admin record.
    #[must_use]
    pub fn from_admin(admin: &AdminUser) -> Self {
        Self {
            id: admin.id,
            email: admin.email.to_string(),
            name: admin.name.clone(),
            role: admin.role,
        }
    }
}

/// Keys under which values are stored in the session.
pub mod session_keys {
    /// The logged-in admin ([`super::CurrentAdmin`]).
    pub const CURRENT_ADMIN: &str = "current_admin";
}
