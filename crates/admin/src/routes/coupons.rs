//! Coupon management route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;

use ondine_core::{CouponId, CouponKind};

use crate::db::coupons::{self, CreateCoupon};
use crate::error::{AppError, Result};
use crate::middleware::auth::{RequireAdmin, require_write};
use crate::state::AppState;

/// List all coupons.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let coupons = coupons::list(state.store_pool()).await?;
    Ok(Json(coupons))
}

/// Create a coupon.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(mut params): Json<CreateCoupon>,
) -> Result<impl IntoResponse> {
    require_write(&admin)?;

    params.code = params.code.trim().to_uppercase();
    if params.code.is_empty() {
        return Err(AppError::Validation("a coupon code is required".to_owned()));
    }
    if params.value <= Decimal::ZERO {
        return Err(AppError::Validation(
            "the coupon value must be positive".to_owned(),
        ));
    }
    if params.kind == CouponKind::Percent && params.value > Decimal::from(100) {
        return Err(AppError::Validation(
            "a percent coupon cannot exceed 100".to_owned(),
        ));
    }

    let coupon = coupons::create(state.store_pool(), &params).await?;
    Ok((StatusCode::CREATED, Json(coupon)))
}

/// Deactivate a coupon.
pub async fn deactivate(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<CouponId>,
) -> Result<impl IntoResponse> {
    require_write(&admin)?;

    coupons::deactivate(state.store_pool(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
