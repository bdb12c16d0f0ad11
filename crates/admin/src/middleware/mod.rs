//! HTTP middleware: sessions and admin authentication.

pub mod auth;
pub mod session;

pub use session::create_session_layer;
