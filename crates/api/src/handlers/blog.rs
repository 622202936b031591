//! Handlers for the `/blog` resource.
//!
//! Reads are public and show published posts only; admins may also list
//! drafts. Every write goes through [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use upstart_core::blog::{excerpt, slugify, validate_slug, validate_title};
use upstart_core::error::CoreError;
use upstart_core::identity::IdentityError;
use upstart_core::jobs::required_text;
use upstart_core::types::DbId;
use upstart_db::models::blog_post::{BlogPost, CreateBlogPost, UpdateBlogPost};
use upstart_db::repositories::{AdminRepo, BlogPostRepo};

use crate::error::AppResult;
use crate::middleware::auth::OptionalBearer;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_unpublished: bool,
}

/// Request body for `POST /blog`.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    /// Derived from the title when omitted.
    pub slug: Option<String>,
    /// Derived from the content when omitted.
    pub excerpt: Option<String>,
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub is_published: bool,
}

#[derive(Debug, Deserialize)]
pub struct FeatureRequest {
    pub is_featured: bool,
}

#[derive(Debug, Serialize)]
pub struct AdminStatus {
    pub is_admin: bool,
}

// ---------------------------------------------------------------------------
// Public reads
// ---------------------------------------------------------------------------

/// GET /api/v1/blog
///
/// Featured post first, then newest. `?include_unpublished=true` is honored
/// for admins only.
pub async fn list(
    State(state): State<AppState>,
    OptionalBearer(token): OptionalBearer,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<DataResponse<Vec<BlogPost>>>> {
    let include_unpublished =
        query.include_unpublished && caller_is_admin(&state, token.as_deref()).await?;
    let posts = BlogPostRepo::list(&state.pool, include_unpublished).await?;
    Ok(Json(DataResponse { data: posts }))
}

/// GET /api/v1/blog/featured
///
/// The featured published post, or `null`.
pub async fn featured(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Option<BlogPost>>>> {
    let post = BlogPostRepo::find_featured(&state.pool).await?;
    Ok(Json(DataResponse { data: post }))
}

/// GET /api/v1/blog/admin-status
///
/// Whether the caller may manage posts. Anonymous callers get `false`.
pub async fn admin_status(
    State(state): State<AppState>,
    OptionalBearer(token): OptionalBearer,
) -> AppResult<Json<DataResponse<AdminStatus>>> {
    let is_admin = caller_is_admin(&state, token.as_deref()).await?;
    Ok(Json(DataResponse {
        data: AdminStatus { is_admin },
    }))
}

/// GET /api/v1/blog/{slug}
///
/// Drafts are only visible to admins.
pub async fn get_by_slug(
    State(state): State<AppState>,
    OptionalBearer(token): OptionalBearer,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<BlogPost>>> {
    let post = BlogPostRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| CoreError::not_found("BlogPost", &slug))?;
    if !post.is_published && !caller_is_admin(&state, token.as_deref()).await? {
        return Err(CoreError::not_found("BlogPost", &slug).into());
    }
    Ok(Json(DataResponse { data: post }))
}

// ---------------------------------------------------------------------------
// Admin writes
// ---------------------------------------------------------------------------

/// POST /api/v1/blog
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreatePostRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<BlogPost>>)> {
    let title = validate_title(&input.title)?;
    let content = required_text(&input.content, "content")?;
    let slug = match input.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => {
            validate_slug(slug)?;
            slug.to_string()
        }
        None => slugify(&title),
    };
    ensure_slug_free(&state, &slug, None).await?;

    let excerpt = input
        .excerpt
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| excerpt(&content));

    let post = BlogPostRepo::create(
        &state.pool,
        &CreateBlogPost {
            author_id: admin.user.id,
            title,
            slug,
            excerpt,
            content,
            cover_image_url: input.cover_image_url,
            is_published: input.is_published,
        },
    )
    .await?;

    tracing::info!(post_id = post.id, slug = %post.slug, "Blog post created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: post })))
}

/// PUT /api/v1/blog/{id}
///
/// Partial update. The slug only changes when one is supplied.
pub async fn update(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBlogPost>,
) -> AppResult<Json<DataResponse<BlogPost>>> {
    let title = input.title.as_deref().map(validate_title).transpose()?;
    let content = input
        .content
        .as_deref()
        .map(|c| required_text(c, "content"))
        .transpose()?;
    let slug = match input.slug.as_deref().map(str::trim) {
        Some(slug) => {
            validate_slug(slug)?;
            ensure_slug_free(&state, slug, Some(id)).await?;
            Some(slug.to_string())
        }
        None => None,
    };

    let input = UpdateBlogPost {
        title,
        slug,
        content,
        ..input
    };
    let post = BlogPostRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("BlogPost", id))?;

    tracing::info!(post_id = id, "Blog post updated");
    Ok(Json(DataResponse { data: post }))
}

/// DELETE /api/v1/blog/{id}
pub async fn delete(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !BlogPostRepo::delete(&state.pool, id).await? {
        return Err(CoreError::not_found("BlogPost", id).into());
    }
    tracing::info!(post_id = id, "Blog post deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/blog/{id}/publish
pub async fn set_published(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<PublishRequest>,
) -> AppResult<Json<DataResponse<BlogPost>>> {
    let post = BlogPostRepo::set_published(&state.pool, id, input.is_published)
        .await?
        .ok_or_else(|| CoreError::not_found("BlogPost", id))?;
    tracing::info!(post_id = id, is_published = input.is_published, "Blog post publish state changed");
    Ok(Json(DataResponse { data: post }))
}

/// PUT /api/v1/blog/{id}/feature
///
/// Featuring a post un-features the previous one.
pub async fn set_featured(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<FeatureRequest>,
) -> AppResult<Json<DataResponse<BlogPost>>> {
    let post = BlogPostRepo::set_featured(&state.pool, id, input.is_featured)
        .await?
        .ok_or_else(|| CoreError::not_found("BlogPost", id))?;
    tracing::info!(post_id = id, is_featured = input.is_featured, "Blog post feature state changed");
    Ok(Json(DataResponse { data: post }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Admin check for endpoints that also serve anonymous callers. An invalid
/// or expired token counts as anonymous.
async fn caller_is_admin(state: &AppState, token: Option<&str>) -> AppResult<bool> {
    let Some(token) = token else {
        return Ok(false);
    };
    let user = match state.identity.get_user(token).await {
        Ok(user) => user,
        Err(IdentityError::Unauthorized(_) | IdentityError::InvalidCredentials) => {
            return Ok(false)
        }
        Err(err) => return Err(err.into()),
    };
    Ok(AdminRepo::is_admin(&state.pool, user.id).await?)
}

async fn ensure_slug_free(state: &AppState, slug: &str, exclude: Option<DbId>) -> AppResult<()> {
    if BlogPostRepo::slug_taken(&state.pool, slug, exclude).await? {
        return Err(CoreError::Conflict(format!("Slug '{slug}' is already in use")).into());
    }
    Ok(())
}
