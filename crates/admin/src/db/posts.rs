//! News post management (store database).

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use ondine_core::{PostId, PostStatus};

use super::RepositoryError;

/// A post as managed from the back office (drafts included).
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Post {
    pub id: PostId,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub body_markdown: String,
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating or updating a post.
#[derive(Debug, serde::Deserialize)]
pub struct PostInput {
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub body_markdown: String,
}

const COLUMNS: &str =
    "id, slug, title, excerpt, body_markdown, status, published_at, created_at, updated_at";

/// List all posts, drafts first, then by recency.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn list(pool: &PgPool) -> Result<Vec<Post>, RepositoryError> {
    let posts = sqlx::query_as::<_, Post>(&format!(
        r"
        SELECT {COLUMNS}
        FROM storefront.post
        ORDER BY status ASC, updated_at DESC
        ",
    ))
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Create a new draft post.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the slug already exists.
pub async fn create(pool: &PgPool, input: &PostInput) -> Result<Post, RepositoryError> {
    let post = sqlx::query_as::<_, Post>(&format!(
        r"
        INSERT INTO storefront.post (slug, title, excerpt, body_markdown)
        VALUES ($1, $2, $3, $4)
        RETURNING {COLUMNS}
        ",
    ))
    .bind(&input.slug)
    .bind(&input.title)
    .bind(&input.excerpt)
    .bind(&input.body_markdown)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict("slug already exists".to_owned());
        }
        RepositoryError::Database(e)
    })?;

    Ok(post)
}

/// Update a post's content.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the post doesn't exist.
pub async fn update(
    pool: &PgPool,
    id: PostId,
    input: &PostInput,
) -> Result<Post, RepositoryError> {
    let post = sqlx::query_as::<_, Post>(&format!(
        r"
        UPDATE storefront.post
        SET slug = $2, title = $3, excerpt = $4, body_markdown = $5, updated_at = NOW()
        WHERE id = $1
        RETURNING {COLUMNS}
        ",
    ))
    .bind(id.as_i32())
    .bind(&input.slug)
    .bind(&input.title)
    .bind(&input.excerpt)
    .bind(&input.body_markdown)
    .fetch_optional(pool)
    .await?;

    post.ok_or(RepositoryError::NotFound)
}

/// Publish or unpublish a post.
///
/// Publishing stamps `published_at` on first publish and keeps the
/// original timestamp on re-publish.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the post doesn't exist.
pub async fn set_status(
    pool: &PgPool,
    id: PostId,
    status: PostStatus,
) -> Result<Post, RepositoryError> {
    let post = sqlx::query_as::<_, Post>(&format!(
        r"
        UPDATE storefront.post
        SET status = $2,
            published_at = CASE
                WHEN $2 = 'published'::storefront.post_status AND published_at IS NULL
                THEN NOW()
                ELSE published_at
            END,
            updated_at = NOW()
        WHERE id = $1
        RETURNING {COLUMNS}
        ",
    ))
    .bind(id.as_i32())
    .bind(status)
    .fetch_optional(pool)
    .await?;

    post.ok_or(RepositoryError::NotFound)
}

/// Number of published posts, for the dashboard.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn published_count(pool: &PgPool) -> Result<i64, RepositoryError> {
    let count: i64 = sqlx::query_scalar(
        r"SELECT COUNT(*) FROM storefront.post WHERE status = 'published'",
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
