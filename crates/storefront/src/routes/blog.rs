//! News/blog route handlers.
//!
//! Post bodies are stored as markdown and rendered to HTML at read time.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};

use crate::db::posts;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// A post as listed on the index.
#[derive(serde::Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// A full post with its rendered body.
#[derive(serde::Serialize)]
pub struct PostView {
    pub slug: String,
    pub title: String,
    pub body_html: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// List published posts, newest first.
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let posts = posts::list_published(state.pool()).await?;

    let summaries: Vec<PostSummary> = posts
        .into_iter()
        .map(|p| PostSummary {
            slug: p.slug,
            title: p.title,
            excerpt: p.excerpt,
            published_at: p.published_at,
        })
        .collect();

    Ok(Json(summaries))
}

/// Show a published post with its markdown rendered.
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let post = posts::get_published_by_slug(state.pool(), &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("no such post".to_owned()))?;

    let body_html = comrak::markdown_to_html(&post.body_markdown, &comrak::Options::default());

    Ok(Json(PostView {
        slug: post.slug,
        title: post.title,
        body_html,
        published_at: post.published_at,
    }))
}
