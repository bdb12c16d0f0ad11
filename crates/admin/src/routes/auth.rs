//! Admin authentication route handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::middleware::auth::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::AdminAuthService;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, serde::Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login with email and password.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let service = AdminAuthService::new(state.admin_pool());
    let admin = service.login(&req.email, &req.password).await?;

    let current = CurrentAdmin::from_admin(&admin);
    set_current_admin(&session, &current)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(admin = %admin.id, role = %admin.role, "admin logged in");

    Ok(Json(current))
}

/// Logout the current admin.
pub async fn logout(session: Session) -> Result<impl IntoResponse> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(StatusCode::NO_CONTENT)
}
