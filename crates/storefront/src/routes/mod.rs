//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (verifies database)
//!
//! # Auth
//! POST /auth/register             - Create account + session
//! POST /auth/login                - Login
//! POST /auth/logout               - Logout
//!
//! # Account (requires auth)
//! GET    /account                 - Profile
//! PATCH  /account                 - Update profile
//! GET    /account/addresses       - List addresses
//! POST   /account/addresses       - Create address
//! PUT    /account/addresses/{id}  - Update address
//! DELETE /account/addresses/{id}  - Delete address
//! GET    /account/returns         - List return requests
//!
//! # Grouped shipping (requires auth)
//! GET  /account/package           - Active package with countdown + summary
//! POST /account/package           - Open a package (address + method)
//! POST /account/package/close     - Close and ship now
//! POST /account/package/orders    - Add an order to the active package
//! GET  /shipping-methods          - Methods offered at creation
//!
//! # Orders (requires auth)
//! GET  /orders                    - Order history
//! GET  /orders/{id}               - Order detail with line items
//! POST /orders/{id}/return        - File a return request
//!
//! # Promotions
//! POST /coupons/validate          - Quote a coupon against an order total
//! GET  /gift-cards/{code}         - Gift card balance
//! POST /gift-cards/redeem         - Redeem into wallet (requires auth)
//! GET  /wallet                    - Wallet balance + ledger (requires auth)
//!
//! # Content
//! GET  /blog                      - Published posts
//! GET  /blog/{slug}               - One post, markdown rendered
//!
//! # Live shopping
//! GET  /live                      - Streams with phase + sale progress
//! GET  /live/{id}                 - One stream
//! POST /live/{id}/join            - Viewer joined (returns count)
//! POST /live/{id}/leave           - Viewer left
//! GET  /live/{id}/messages        - Chat messages
//! POST /live/{id}/messages        - Post a chat message (requires auth)
//! ```

pub mod account;
pub mod auth;
pub mod blog;
pub mod coupons;
pub mod gift_cards;
pub mod live;
pub mod orders;
pub mod packages;
pub mod wallet;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    use axum::routing::patch;

    Router::new()
        .route("/", get(account::profile).patch(account::update_profile))
        .route(
            "/addresses",
            get(account::addresses).post(account::create_address),
        )
        .route(
            "/addresses/{id}",
            patch(account::update_address)
                .put(account::update_address)
                .delete(account::delete_address),
        )
        .route("/returns", get(account::returns))
        // Grouped shipping
        .route(
            "/package",
            get(packages::show).post(packages::create),
        )
        .route("/package/close", post(packages::close))
        .route("/package/orders", post(packages::add_order))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/return", post(orders::request_return))
}

/// Create the live-shopping routes router.
pub fn live_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(live::index))
        .route("/{id}", get(live::show))
        .route("/{id}/join", post(live::join))
        .route("/{id}/leave", post(live::leave))
        .route(
            "/{id}/messages",
            get(live::messages).post(live::post_message),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/account", account_routes())
        .nest("/orders", order_routes())
        .route("/shipping-methods", get(packages::shipping_methods))
        .route("/coupons/validate", post(coupons::validate))
        .route("/gift-cards/{code}", get(gift_cards::show))
        .route("/gift-cards/redeem", post(gift_cards::redeem))
        .route("/wallet", get(wallet::show))
        .route("/blog", get(blog::index))
        .route("/blog/{slug}", get(blog::show))
        .nest("/live", live_routes())
}
