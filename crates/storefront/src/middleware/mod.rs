//! HTTP middleware: sessions, authentication extractors, request IDs.

pub mod auth;
pub mod request_id;
pub mod session;

pub use session::create_session_layer;
