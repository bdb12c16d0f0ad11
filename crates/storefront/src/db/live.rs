//! Database operations for live-shopping streams.
//!
//! Viewer counts and sale progress are plain counters on the stream row;
//! chat is an append-only message table. Clients poll — there is no push
//! channel in this service.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use ondine_core::{StreamId, StreamMessageId, UserId};

use super::RepositoryError;

/// A live-shopping stream.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct LiveStream {
    pub id: StreamId,
    pub title: String,
    pub host_name: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// Sales goal for the stream, in units.
    pub goal_units: i32,
    pub units_sold: i32,
    pub viewer_count: i32,
}

/// A chat message on a stream.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct StreamMessage {
    pub id: StreamMessageId,
    #[serde(skip)]
    pub stream_id: StreamId,
    #[serde(skip)]
    pub user_id: UserId,
    /// Denormalized at write time so chat survives display-name changes.
    pub author: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

const STREAM_COLUMNS: &str =
    "id, title, host_name, starts_at, ends_at, goal_units, units_sold, viewer_count";

/// List streams, soonest first.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn list(pool: &PgPool) -> Result<Vec<LiveStream>, RepositoryError> {
    let streams = sqlx::query_as::<_, LiveStream>(&format!(
        r"
        SELECT {STREAM_COLUMNS}
        FROM storefront.live_stream
        ORDER BY starts_at ASC
        ",
    ))
    .fetch_all(pool)
    .await?;

    Ok(streams)
}

/// Get a stream by id.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn get(pool: &PgPool, id: StreamId) -> Result<Option<LiveStream>, RepositoryError> {
    let stream = sqlx::query_as::<_, LiveStream>(&format!(
        r"
        SELECT {STREAM_COLUMNS}
        FROM storefront.live_stream
        WHERE id = $1
        ",
    ))
    .bind(id.as_i32())
    .fetch_optional(pool)
    .await?;

    Ok(stream)
}

/// Record a viewer joining; returns the new viewer count.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the stream doesn't exist.
pub async fn join(pool: &PgPool, id: StreamId) -> Result<i32, RepositoryError> {
    let count: Option<i32> = sqlx::query_scalar(
        r"
        UPDATE storefront.live_stream
        SET viewer_count = viewer_count + 1
        WHERE id = $1
        RETURNING viewer_count
        ",
    )
    .bind(id.as_i32())
    .fetch_optional(pool)
    .await?;

    count.ok_or(RepositoryError::NotFound)
}

/// Record a viewer leaving; the count never goes below zero.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the stream doesn't exist.
pub async fn leave(pool: &PgPool, id: StreamId) -> Result<i32, RepositoryError> {
    let count: Option<i32> = sqlx::query_scalar(
        r"
        UPDATE storefront.live_stream
        SET viewer_count = GREATEST(viewer_count - 1, 0)
        WHERE id = $1
        RETURNING viewer_count
        ",
    )
    .bind(id.as_i32())
    .fetch_optional(pool)
    .await?;

    count.ok_or(RepositoryError::NotFound)
}

/// List the most recent chat messages, oldest of the page first.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn messages(
    pool: &PgPool,
    stream_id: StreamId,
    limit: i64,
) -> Result<Vec<StreamMessage>, RepositoryError> {
    let mut messages = sqlx::query_as::<_, StreamMessage>(
        r"
        SELECT id, stream_id, user_id, author, body, sent_at
        FROM storefront.stream_message
        WHERE stream_id = $1
        ORDER BY sent_at DESC, id DESC
        LIMIT $2
        ",
    )
    .bind(stream_id.as_i32())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    messages.reverse();
    Ok(messages)
}

/// Post a chat message.
///
/// # Errors
///
/// Returns error if the database insert fails.
pub async fn post_message(
    pool: &PgPool,
    stream_id: StreamId,
    user_id: UserId,
    author: &str,
    body: &str,
) -> Result<StreamMessage, RepositoryError> {
    let message = sqlx::query_as::<_, StreamMessage>(
        r"
        INSERT INTO storefront.stream_message (stream_id, user_id, author, body)
        VALUES ($1, $2, $3, $4)
        RETURNING id, stream_id, user_id, author, body, sent_at
        ",
    )
    .bind(stream_id.as_i32())
    .bind(user_id.as_i32())
    .bind(author)
    .bind(body)
    .fetch_one(pool)
    .await?;

    Ok(message)
}
