//! Content management route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use ondine_core::{PostId, PostStatus};

use crate::db::posts::{self, PostInput};
use crate::error::{AppError, Result};
use crate::middleware::auth::{RequireAdmin, require_write};
use crate::state::AppState;

/// List all posts, drafts included.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let posts = posts::list(state.store_pool()).await?;
    Ok(Json(posts))
}

/// Create a draft post.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<PostInput>,
) -> Result<impl IntoResponse> {
    require_write(&admin)?;
    validate(&input)?;

    let post = posts::create(state.store_pool(), &input).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// Update a post's content.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<PostId>,
    Json(input): Json<PostInput>,
) -> Result<impl IntoResponse> {
    require_write(&admin)?;
    validate(&input)?;

    let post = posts::update(state.store_pool(), id, &input).await?;
    Ok(Json(post))
}

/// Publish a post.
pub async fn publish(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<PostId>,
) -> Result<impl IntoResponse> {
    require_write(&admin)?;

    let post = posts::set_status(state.store_pool(), id, PostStatus::Published).await?;
    Ok(Json(post))
}

/// Take a post back to draft.
pub async fn unpublish(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<PostId>,
) -> Result<impl IntoResponse> {
    require_write(&admin)?;

    let post = posts::set_status(state.store_pool(), id, PostStatus::Draft).await?;
    Ok(Json(post))
}

fn validate(input: &PostInput) -> Result<()> {
    if input.slug.trim().is_empty() || input.title.trim().is_empty() {
        return Err(AppError::Validation(
            "slug and title are required".to_owned(),
        ));
    }
    if !input
        .slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(AppError::Validation(
            "slug may only contain lowercase letters, digits and dashes".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(slug: &str) -> PostInput {
        PostInput {
            slug: slug.to_owned(),
            title: "Title".to_owned(),
            excerpt: None,
            body_markdown: "Body".to_owned(),
        }
    }

    #[test]
    fn slugs_are_restricted_to_url_safe_characters() {
        assert!(validate(&input("spring-edit-2025")).is_ok());
        assert!(validate(&input("Spring Edit")).is_err());
        assert!(validate(&input("spring_edit")).is_err());
        assert!(validate(&input("")).is_err());
    }
}
