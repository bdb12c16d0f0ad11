//! Grouped-shipping route handlers.
//!
//! One resource, two mutually exclusive states: either the caller has an
//! active package (countdown + summary + linked orders) or they don't
//! (the client renders the creation form from `/shipping-methods` and
//! the saved addresses).

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use ondine_core::OrderId;

use crate::error::Result;
use crate::middleware::auth::RequireAuth;
use crate::services::PackageService;
use crate::services::packages::{ActivePackageView, CreatePackageRequest};
use crate::state::AppState;

/// Response for `GET /account/package`.
#[derive(serde::Serialize)]
pub struct PackageStatusResponse {
    pub has_active_package: bool,
    pub package: Option<ActivePackageView>,
}

/// Show the caller's active package, if any.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<impl IntoResponse> {
    let package = PackageService::new(state.pool())
        .load_active(current.id)
        .await?;

    Ok(Json(PackageStatusResponse {
        has_active_package: package.is_some(),
        package,
    }))
}

/// Open a new package.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(req): Json<CreatePackageRequest>,
) -> Result<impl IntoResponse> {
    let view = PackageService::new(state.pool())
        .create(current.id, req)
        .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// Close the caller's active package and hand it to dispatch.
pub async fn close(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<impl IntoResponse> {
    let closed = PackageService::new(state.pool()).close(current.id).await?;
    Ok(Json(closed))
}

/// Request body for adding an order to the active package.
#[derive(Debug, serde::Deserialize)]
pub struct AddOrderRequest {
    pub order_id: OrderId,
}

/// Add one of the caller's orders to their active package.
pub async fn add_order(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(req): Json<AddOrderRequest>,
) -> Result<impl IntoResponse> {
    PackageService::new(state.pool())
        .add_order(current.id, req.order_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the shipping methods offered at package creation.
pub async fn shipping_methods(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let methods = state.shipping_methods().await?;
    Ok(Json(methods.as_ref().clone()))
}
