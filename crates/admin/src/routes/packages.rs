//! Dispatch route handlers for grouped-shipping packages.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::{info, warn};

use ondine_core::{PackageId, PackageStatus};

use crate::db::packages;
use crate::error::{AppError, Result};
use crate::middleware::auth::{RequireAdmin, require_write};
use crate::state::AppState;

/// List closed packages awaiting dispatch.
pub async fn closed(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let packages = packages::list_closed(state.store_pool()).await?;
    Ok(Json(packages))
}

/// Request body for marking a package shipped.
#[derive(Debug, serde::Deserialize)]
pub struct ShipRequest {
    pub tracking_reference: String,
}

/// Mark a closed package shipped and notify the owner.
pub async fn ship(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<PackageId>,
    Json(req): Json<ShipRequest>,
) -> Result<impl IntoResponse> {
    require_write(&admin)?;

    let tracking = req.tracking_reference.trim();
    if tracking.is_empty() {
        return Err(AppError::Validation(
            "a tracking reference is required".to_owned(),
        ));
    }

    let package = packages::get(state.store_pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("no such package".to_owned()))?;

    // Reject with the precise transition instead of a generic message.
    package.status.transition(PackageStatus::Shipped)?;

    let shipped = packages::mark_shipped(state.store_pool(), id, tracking)
        .await?
        .ok_or_else(|| AppError::Conflict("package is no longer awaiting dispatch".to_owned()))?;

    info!(package = %id, admin = %admin.id, "package dispatched");

    // Notification is best-effort; dispatch already happened.
    if let Some(email) = state.email()
        && let Err(e) = email
            .send_package_dispatched(&shipped.owner_email, tracking)
            .await
    {
        warn!(error = %e, package = %id, "failed to send dispatch notification");
    }

    Ok(Json(shipped))
}

/// Result of an expiry sweep.
#[derive(serde::Serialize)]
pub struct SweepResult {
    pub closed: u64,
}

/// Auto-close active packages whose five-day window has expired.
pub async fn sweep(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    require_write(&admin)?;

    let closed = packages::sweep_expired(state.store_pool()).await?;
    if closed > 0 {
        info!(closed, admin = %admin.id, "expiry sweep closed packages");
    }

    Ok(Json(SweepResult { closed }))
}
