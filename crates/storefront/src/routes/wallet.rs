//! Wallet route handlers.

use axum::{Json, extract::State, response::IntoResponse};
use rust_decimal::Decimal;

use crate::db::wallet::{self, WalletTransaction};
use crate::error::Result;
use crate::middleware::auth::RequireAuth;
use crate::state::AppState;

/// How many ledger entries the overview returns.
const LEDGER_PAGE_SIZE: i64 = 50;

/// Wallet overview: balance plus recent ledger entries.
#[derive(serde::Serialize)]
pub struct WalletOverview {
    pub balance: Decimal,
    pub transactions: Vec<WalletTransaction>,
}

/// Show the caller's wallet.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<impl IntoResponse> {
    let balance = wallet::balance(state.pool(), current.id).await?;
    let transactions =
        wallet::list_transactions(state.pool(), current.id, LEDGER_PAGE_SIZE).await?;

    Ok(Json(WalletOverview {
        balance,
        transactions,
    }))
}
