//! Database operations for news posts.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use ondine_core::{PostId, PostStatus};

use super::RepositoryError;

/// A news post.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Post {
    pub id: PostId,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub body_markdown: String,
    #[serde(skip)]
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
}

/// List published posts, newest first.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn list_published(pool: &PgPool) -> Result<Vec<Post>, RepositoryError> {
    let posts = sqlx::query_as::<_, Post>(
        r"
        SELECT id, slug, title, excerpt, body_markdown, status, published_at
        FROM storefront.post
        WHERE status = 'published'
        ORDER BY published_at DESC
        ",
    )
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Get a published post by its slug.
///
/// Drafts are invisible to the storefront.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn get_published_by_slug(
    pool: &PgPool,
    slug: &str,
) -> Result<Option<Post>, RepositoryError> {
    let post = sqlx::query_as::<_, Post>(
        r"
        SELECT id, slug, title, excerpt, body_markdown, status, published_at
        FROM storefront.post
        WHERE slug = $1 AND status = 'published'
        ",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}
