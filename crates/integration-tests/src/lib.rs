//! Integration test support for Maison Ondine.
//!
//! The tests in `tests/` exercise the lifecycle logic that spans crates
//! (package lifecycle, coupon rules, return flow) without requiring a
//! live database. Database-backed end-to-end tests run against a
//! dedicated Postgres in CI and are gated behind `STOREFRONT_DATABASE_URL`.

#![cfg_attr(not(test), forbid(unsafe_code))]
