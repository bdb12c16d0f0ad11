//! User models and session keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ondine_core::{Email, UserId};

/// A customer account.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Name to show in chat and greetings: display name when set,
    /// otherwise the local part of the email.
    #[must_use]
    pub fn public_name(&self) -> &str {
        if let Some(name) = self.display_name.as_deref()
            && !name.is_empty()
        {
            return name;
        }
        self.email
            .as_str()
            .split_once('@')
            .map_or(self.email.as_str(), |(local, _)| local)
    }
}

/// The authenticated identity stored in the session.
///
/// Handlers extract this and pass `id` explicitly into every service
/// call; nothing below the HTTP boundary reads ambient user state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
}

impl CurrentUser {
    /// Build the session identity from a full user record.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.to_string(),
            display_name: user.display_name.clone(),
        }
    }

    /// Name to show in chat and greetings.
    #[must_use]
    pub fn public_name(&self) -> &str {
        if let Some(name) = self.display_name.as_deref()
            && !name.is_empty()
        {
            return name;
        }
        self.email
            .split_once('@')
            .map_or(self.email.as_str(), |(local, _)| local)
    }
}

/// Keys under which values are stored in the session.
pub mod session_keys {
    /// The logged-in customer ([`super::CurrentUser`]).
    pub const CURRENT_USER: &str = "current_user";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_name_prefers_display_name() {
        let user = CurrentUser {
            id: UserId::new(1),
            email: "camille@example.com".to_owned(),
            display_name: Some("Camille".to_owned()),
        };
        assert_eq!(user.public_name(), "Camille");
    }

    #[test]
    fn public_name_falls_back_to_email_local_part() {
        let user = CurrentUser {
            id: UserId::new(1),
            email: "camille@example.com".to_owned(),
            display_name: None,
        };
        assert_eq!(user.public_name(), "camille");
    }
}
