//! Account route handlers.
//!
//! These routes require authentication; the caller's identity comes from
//! the `RequireAuth` extractor and is passed explicitly into each query.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use ondine_core::AddressId;

use crate::db::addresses::{self, AddressInput};
use crate::db::returns;
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAuth;
use crate::services::AuthService;
use crate::state::AppState;

/// Display the caller's profile.
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<impl IntoResponse> {
    let user = AuthService::new(state.pool()).get_user(current.id).await?;
    Ok(Json(user))
}

/// Profile update request body.
#[derive(Debug, serde::Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
}

/// Update the caller's profile.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse> {
    crate::db::UserRepository::new(state.pool())
        .update_display_name(current.id, req.display_name.as_deref())
        .await?;

    let user = AuthService::new(state.pool()).get_user(current.id).await?;
    Ok(Json(user))
}

/// List the caller's saved addresses.
pub async fn addresses(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<impl IntoResponse> {
    let addresses = addresses::list_for_user(state.pool(), current.id).await?;
    Ok(Json(addresses))
}

/// Create a new address.
pub async fn create_address(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(input): Json<AddressInput>,
) -> Result<impl IntoResponse> {
    validate_address(&input)?;
    let address = addresses::create(state.pool(), current.id, &input).await?;
    Ok((StatusCode::CREATED, Json(address)))
}

/// Update an address.
pub async fn update_address(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<AddressId>,
    Json(input): Json<AddressInput>,
) -> Result<impl IntoResponse> {
    validate_address(&input)?;
    let address = addresses::update(state.pool(), current.id, id, &input).await?;
    Ok(Json(address))
}

/// Delete an address.
pub async fn delete_address(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<impl IntoResponse> {
    let deleted = addresses::delete(state.pool(), current.id, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("no such address".to_owned()))
    }
}

/// List the caller's return requests.
pub async fn returns(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<impl IntoResponse> {
    let requests = returns::list_for_user(state.pool(), current.id).await?;
    Ok(Json(requests))
}

fn validate_address(input: &AddressInput) -> Result<()> {
    for (field, value) in [
        ("recipient", &input.recipient),
        ("line1", &input.line1),
        ("city", &input.city),
        ("postal_code", &input.postal_code),
        ("country", &input.country),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} is required")));
        }
    }
    Ok(())
}
