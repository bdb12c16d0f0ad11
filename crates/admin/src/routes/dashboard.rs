//! Dashboard route handler.

use axum::{Json, extract::State, response::IntoResponse};

use crate::db::packages::PackageCounts;
use crate::db::{coupons, packages, posts, returns};
use crate::error::Result;
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

/// Counts shown on the back-office landing page.
#[derive(serde::Serialize)]
pub struct Dashboard {
    pub packages: PackageCounts,
    pub pending_returns: i64,
    pub published_posts: i64,
    pub active_coupons: i64,
}

/// Show the dashboard counts.
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let pool = state.store_pool();

    let dashboard = Dashboard {
        packages: packages::counts(pool).await?,
        pending_returns: returns::pending_count(pool).await?,
        published_posts: posts::published_count(pool).await?,
        active_coupons: coupons::active_count(pool).await?,
    };

    Ok(Json(dashboard))
}
