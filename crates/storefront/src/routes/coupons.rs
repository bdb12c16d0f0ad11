//! Coupon route handlers.

use axum::{Json, extract::State, response::IntoResponse};
use rust_decimal::Decimal;

use crate::error::{AppError, Result};
use crate::services::coupons;
use crate::state::AppState;

/// Request body for validating a coupon.
#[derive(Debug, serde::Deserialize)]
pub struct ValidateRequest {
    pub code: String,
    pub order_total: Decimal,
}

/// Quote a coupon against an order total.
///
/// Read-only; the use is counted at checkout.
pub async fn validate(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> Result<impl IntoResponse> {
    if req.code.trim().is_empty() {
        return Err(AppError::Validation("a coupon code is required".to_owned()));
    }

    let quote = coupons::validate(state.pool(), req.code.trim(), req.order_total).await?;
    Ok(Json(quote))
}
