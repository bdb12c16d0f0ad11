//! Back-office services.

pub mod auth;
pub mod email;

pub use auth::AdminAuthService;
pub use email::EmailService;
