//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use ondine_core::OrderId;

use crate::db::orders::{self, Order, OrderItem};
use crate::db::returns;
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAuth;
use crate::state::AppState;

/// List the caller's orders, newest first.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<impl IntoResponse> {
    let orders = orders::list_for_user(state.pool(), current.id).await?;
    Ok(Json(orders))
}

/// An order with its line items.
#[derive(serde::Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Show one of the caller's orders.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<impl IntoResponse> {
    let order = orders::get_owned(state.pool(), current.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("no such order".to_owned()))?;

    let items = orders::items(state.pool(), order.id).await?;

    Ok(Json(OrderDetail { order, items }))
}

/// Request body for filing a return.
#[derive(Debug, serde::Deserialize)]
pub struct ReturnRequestBody {
    pub reason: String,
}

/// File a return request for one of the caller's orders.
pub async fn request_return(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<OrderId>,
    Json(body): Json<ReturnRequestBody>,
) -> Result<impl IntoResponse> {
    if body.reason.trim().is_empty() {
        return Err(AppError::Validation("a reason is required".to_owned()));
    }

    let order = orders::get_owned(state.pool(), current.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("no such order".to_owned()))?;

    let request = returns::create(state.pool(), current.id, order.id, body.reason.trim()).await?;

    Ok((StatusCode::CREATED, Json(request)))
}
