//! Live-shopping route handlers.
//!
//! Streams are plain rows; phase and sale progress are derived from the
//! schedule and counters at read time. Clients poll these endpoints —
//! the cadence is theirs to choose.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use ondine_core::{StreamId, StreamPhase};

use crate::db::live::{self, LiveStream};
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAuth;
use crate::state::AppState;

/// Default and maximum chat page sizes.
const DEFAULT_MESSAGE_LIMIT: i64 = 50;
const MAX_MESSAGE_LIMIT: i64 = 200;

/// Maximum chat message length.
const MAX_MESSAGE_LENGTH: usize = 500;

/// Percentage of the sales goal reached, clamped to 0-100.
///
/// A stream without a goal reads as 0%.
#[must_use]
pub fn progress_percent(units_sold: i32, goal_units: i32) -> u8 {
    if goal_units <= 0 {
        return 0;
    }
    let percent = i64::from(units_sold.max(0)) * 100 / i64::from(goal_units);
    u8::try_from(percent.clamp(0, 100)).unwrap_or(100)
}

/// A stream with its derived phase and progress.
#[derive(serde::Serialize)]
pub struct StreamView {
    #[serde(flatten)]
    pub stream: LiveStream,
    pub phase: StreamPhase,
    pub progress_percent: u8,
}

impl StreamView {
    fn of(stream: LiveStream) -> Self {
        let phase = StreamPhase::at(stream.starts_at, stream.ends_at, Utc::now());
        let progress_percent = progress_percent(stream.units_sold, stream.goal_units);
        Self {
            phase,
            progress_percent,
            stream,
        }
    }
}

/// List streams, soonest first.
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let streams = live::list(state.pool()).await?;
    let views: Vec<StreamView> = streams.into_iter().map(StreamView::of).collect();
    Ok(Json(views))
}

/// Show one stream.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<StreamId>,
) -> Result<impl IntoResponse> {
    let stream = live::get(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("no such stream".to_owned()))?;

    Ok(Json(StreamView::of(stream)))
}

/// Viewer count response.
#[derive(serde::Serialize)]
pub struct ViewerCount {
    pub viewer_count: i32,
}

/// Record a viewer joining.
pub async fn join(
    State(state): State<AppState>,
    Path(id): Path<StreamId>,
) -> Result<impl IntoResponse> {
    let viewer_count = live::join(state.pool(), id).await?;
    Ok(Json(ViewerCount { viewer_count }))
}

/// Record a viewer leaving.
pub async fn leave(
    State(state): State<AppState>,
    Path(id): Path<StreamId>,
) -> Result<impl IntoResponse> {
    let viewer_count = live::leave(state.pool(), id).await?;
    Ok(Json(ViewerCount { viewer_count }))
}

/// Query parameters for the chat page.
#[derive(Debug, serde::Deserialize)]
pub struct MessagesQuery {
    pub limit: Option<i64>,
}

/// List a stream's chat messages, newest page, oldest first.
pub async fn messages(
    State(state): State<AppState>,
    Path(id): Path<StreamId>,
    Query(query): Query<MessagesQuery>,
) -> Result<impl IntoResponse> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_MESSAGE_LIMIT)
        .clamp(1, MAX_MESSAGE_LIMIT);

    let messages = live::messages(state.pool(), id, limit).await?;
    Ok(Json(messages))
}

/// Request body for posting a chat message.
#[derive(Debug, serde::Deserialize)]
pub struct PostMessageRequest {
    pub body: String,
}

/// Post a chat message to a live stream.
pub async fn post_message(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<StreamId>,
    Json(req): Json<PostMessageRequest>,
) -> Result<impl IntoResponse> {
    let body = req.body.trim();
    if body.is_empty() {
        return Err(AppError::Validation("message body is required".to_owned()));
    }
    if body.len() > MAX_MESSAGE_LENGTH {
        return Err(AppError::Validation(format!(
            "message must be at most {MAX_MESSAGE_LENGTH} characters"
        )));
    }

    let stream = live::get(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("no such stream".to_owned()))?;

    if StreamPhase::at(stream.starts_at, stream.ends_at, Utc::now()) != StreamPhase::Live {
        return Err(AppError::Conflict("stream is not live".to_owned()));
    }

    let message = live::post_message(
        state.pool(),
        stream.id,
        current.id,
        current.public_name(),
        body,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped_to_one_hundred() {
        assert_eq!(progress_percent(0, 40), 0);
        assert_eq!(progress_percent(10, 40), 25);
        assert_eq!(progress_percent(40, 40), 100);
        assert_eq!(progress_percent(55, 40), 100);
    }

    #[test]
    fn progress_without_goal_is_zero() {
        assert_eq!(progress_percent(10, 0), 0);
        assert_eq!(progress_percent(-3, 40), 0);
    }
}
