//! Gift card management route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rand::Rng;
use rust_decimal::Decimal;
use tracing::info;

use ondine_core::GiftCardId;

use crate::db::RepositoryError;
use crate::db::gift_cards;
use crate::error::{AppError, Result};
use crate::middleware::auth::{RequireAdmin, require_write};
use crate::state::AppState;

/// Gift card code length.
const CODE_LENGTH: usize = 16;

/// Alphabet for gift card codes. No 0/O or 1/I, codes get read aloud.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generate a random gift card code.
fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CODE_ALPHABET.len());
            char::from(CODE_ALPHABET[idx])
        })
        .collect()
}

/// List all gift cards.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let cards = gift_cards::list(state.store_pool()).await?;
    Ok(Json(cards))
}

/// Request body for issuing a gift card.
#[derive(Debug, serde::Deserialize)]
pub struct IssueRequest {
    pub balance: Decimal,
}

/// Issue a new gift card with a random code.
pub async fn issue(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(req): Json<IssueRequest>,
) -> Result<impl IntoResponse> {
    require_write(&admin)?;

    if req.balance <= Decimal::ZERO {
        return Err(AppError::Validation(
            "the balance must be positive".to_owned(),
        ));
    }

    // Retry on the astronomically unlikely code collision.
    let card = loop {
        match gift_cards::issue(state.store_pool(), &generate_code(), req.balance).await {
            Ok(card) => break card,
            Err(RepositoryError::Conflict(_)) => {}
            Err(e) => return Err(e.into()),
        }
    };

    info!(card = %card.id, admin = %admin.id, "gift card issued");

    Ok((StatusCode::CREATED, Json(card)))
}

/// Void an active gift card.
pub async fn void(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<GiftCardId>,
) -> Result<impl IntoResponse> {
    require_write(&admin)?;

    let voided = gift_cards::void(state.store_pool(), id).await?;
    if !voided {
        return Err(AppError::Conflict(
            "gift card is no longer active".to_owned(),
        ));
    }

    info!(card = %id, admin = %admin.id, "gift card voided");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_have_the_expected_shape() {
        let code = generate_code();
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn generated_codes_avoid_ambiguous_characters() {
        for _ in 0..100 {
            let code = generate_code();
            assert!(!code.contains(['0', 'O', '1', 'I']));
        }
    }
}
