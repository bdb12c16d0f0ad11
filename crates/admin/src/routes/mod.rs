//! HTTP route handlers for the back-office API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (verifies both databases)
//!
//! # Auth
//! POST /auth/login                - Admin login
//! POST /auth/logout               - Admin logout
//!
//! # Dashboard
//! GET  /dashboard                 - Counts (packages, returns, posts, coupons)
//!
//! # Dispatch (grouped shipping)
//! GET  /packages/closed           - Closed packages awaiting dispatch
//! POST /packages/{id}/ship        - Mark shipped (+ tracking, emails owner)
//! POST /packages/sweep            - Auto-close expired active packages
//!
//! # Returns
//! GET  /returns                   - Return requests (?status= filter)
//! POST /returns/{id}/approve      - requested -> approved
//! POST /returns/{id}/reject       - requested -> rejected
//! POST /returns/{id}/receive      - approved -> received
//! POST /returns/{id}/refund       - received -> refunded (credits wallet)
//!
//! # Promotions
//! GET    /coupons                 - List coupons
//! POST   /coupons                 - Create coupon
//! DELETE /coupons/{id}            - Deactivate coupon
//! GET    /gift-cards              - List gift cards
//! POST   /gift-cards              - Issue gift card (random code)
//! POST   /gift-cards/{id}/void    - Void an active card
//!
//! # Content
//! GET  /posts                     - All posts, drafts included
//! POST /posts                     - Create draft
//! PUT  /posts/{id}                - Update content
//! POST /posts/{id}/publish        - Publish
//! POST /posts/{id}/unpublish      - Back to draft
//! ```
//!
//! All routes except `/auth/login` and the health checks require an
//! admin session; mutating routes additionally require a writing role.

pub mod auth;
pub mod coupons;
pub mod dashboard;
pub mod gift_cards;
pub mod packages;
pub mod posts;
pub mod returns;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create all routes for the back office.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        // Dashboard
        .route("/dashboard", get(dashboard::show))
        // Dispatch
        .route("/packages/closed", get(packages::closed))
        .route("/packages/{id}/ship", post(packages::ship))
        .route("/packages/sweep", post(packages::sweep))
        // Returns
        .route("/returns", get(returns::index))
        .route("/returns/{id}/approve", post(returns::approve))
        .route("/returns/{id}/reject", post(returns::reject))
        .route("/returns/{id}/receive", post(returns::receive))
        .route("/returns/{id}/refund", post(returns::refund))
        // Promotions
        .route("/coupons", get(coupons::index).post(coupons::create))
        .route("/coupons/{id}", delete(coupons::deactivate))
        .route("/gift-cards", get(gift_cards::index).post(gift_cards::issue))
        .route("/gift-cards/{id}/void", post(gift_cards::void))
        // Content
        .route("/posts", get(posts::index).post(posts::create))
        .route("/posts/{id}", put(posts::update))
        .route("/posts/{id}/publish", post(posts::publish))
        .route("/posts/{id}/unpublish", post(posts::unpublish))
}
