//! Ondine Core - Shared types library.
//!
//! This crate provides common types used across all Maison Ondine components:
//! - `storefront` - Public storefront API
//! - `admin` - Internal back-office API
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. Everything that touches the outside world lives in the service
//! crates; what lives here is the vocabulary they share: type-safe IDs,
//! money, statuses and the grouped-shipping lifecycle math.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money, emails, statuses and package lifecycle

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
