//! Returns management route handlers.
//!
//! Each action validates the move against the return lifecycle first,
//! then issues a conditional update; a concurrent change turns into a
//! conflict instead of an overwrite.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use tracing::{info, warn};

use ondine_core::{ReturnRequestId, ReturnStatus};

use crate::db::returns::{self, ReturnCase};
use crate::error::{AppError, Result};
use crate::middleware::auth::{RequireAdmin, require_write};
use crate::state::AppState;

/// Query parameters for the returns list.
#[derive(Debug, serde::Deserialize)]
pub struct IndexQuery {
    pub status: Option<ReturnStatus>,
}

/// List return requests, optionally filtered by status.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<IndexQuery>,
) -> Result<impl IntoResponse> {
    let cases = returns::list(state.store_pool(), query.status).await?;
    Ok(Json(cases))
}

/// Move a return to `approved`.
pub async fn approve(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ReturnRequestId>,
) -> Result<impl IntoResponse> {
    transition(&state, &admin, id, ReturnStatus::Approved).await
}

/// Move a return to `rejected`.
pub async fn reject(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ReturnRequestId>,
) -> Result<impl IntoResponse> {
    transition(&state, &admin, id, ReturnStatus::Rejected).await
}

/// Move a return to `received` (the parcel arrived back).
pub async fn receive(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ReturnRequestId>,
) -> Result<impl IntoResponse> {
    transition(&state, &admin, id, ReturnStatus::Received).await
}

/// Request body for refunding a return.
#[derive(Debug, Default, serde::Deserialize)]
pub struct RefundRequest {
    /// Amount to refund; defaults to the order total.
    pub amount: Option<Decimal>,
}

/// Refund a received return into the customer's wallet.
pub async fn refund(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ReturnRequestId>,
    Json(req): Json<RefundRequest>,
) -> Result<impl IntoResponse> {
    require_write(&admin)?;

    let case = load(&state, id).await?;
    case.status.transition(ReturnStatus::Refunded)?;

    let amount = req.amount.unwrap_or(case.order_total);
    if amount <= Decimal::ZERO || amount > case.order_total {
        return Err(AppError::Validation(
            "refund amount must be positive and at most the order total".to_owned(),
        ));
    }

    let refunded = returns::refund(
        state.store_pool(),
        case.id,
        case.user_id,
        amount,
        &case.order_number,
    )
    .await?;

    if !refunded {
        return Err(AppError::Conflict(
            "return is no longer awaiting refund".to_owned(),
        ));
    }

    info!(case = %id, admin = %admin.id, amount = %amount, "return refunded");

    if let Some(email) = state.email()
        && let Err(e) = email
            .send_refund_confirmation(&case.customer_email, &case.order_number, amount)
            .await
    {
        warn!(error = %e, case = %id, "failed to send refund confirmation");
    }

    let case = load(&state, id).await?;
    Ok(Json(case))
}

/// Shared flow for the plain status moves.
async fn transition(
    state: &AppState,
    admin: &crate::models::CurrentAdmin,
    id: ReturnRequestId,
    to: ReturnStatus,
) -> Result<Json<ReturnCase>> {
    require_write(admin)?;

    let case = load(state, id).await?;
    case.status.transition(to)?;

    let moved = returns::set_status(state.store_pool(), id, case.status, to).await?;
    if !moved {
        return Err(AppError::Conflict(
            "return changed status concurrently".to_owned(),
        ));
    }

    info!(case = %id, admin = %admin.id, from = ?case.status, to = ?to, "return transitioned");

    let case = load(state, id).await?;
    Ok(Json(case))
}

async fn load(state: &AppState, id: ReturnRequestId) -> Result<ReturnCase> {
    returns::get(state.store_pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("no such return request".to_owned()))
}
