//! Gift card route handlers.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;

use crate::db::wallet;
use crate::error::Result;
use crate::middleware::auth::RequireAuth;
use crate::services::gift_cards;
use crate::state::AppState;

/// Check a gift card's balance by code.
pub async fn show(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse> {
    let balance = gift_cards::balance(state.pool(), &code).await?;
    Ok(Json(balance))
}

/// Request body for redeeming a gift card.
#[derive(Debug, serde::Deserialize)]
pub struct RedeemRequest {
    pub code: String,
}

/// Response after a successful redemption.
#[derive(serde::Serialize)]
pub struct RedeemResponse {
    pub credited: Decimal,
    pub wallet_balance: Decimal,
}

/// Redeem a gift card into the caller's wallet.
pub async fn redeem(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(req): Json<RedeemRequest>,
) -> Result<impl IntoResponse> {
    let credited = gift_cards::redeem(state.pool(), current.id, req.code.trim()).await?;
    let wallet_balance = wallet::balance(state.pool(), current.id).await?;

    Ok(Json(RedeemResponse {
        credited,
        wallet_balance,
    }))
}
