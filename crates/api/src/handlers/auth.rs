//! Handlers for the `/auth` resource (signup, login, refresh, logout,
//! session lookup and post-authentication resolution).

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use upstart_core::identity::AuthSession;
use upstart_core::session::{SessionUser, UserMetadata};
use validator::Validate;

use super::validate_body;
use crate::error::AppResult;
use crate::middleware::auth::{AuthUser, OptionalBearer};
use crate::middleware::identity::{CurrentIdentity, UserIdentity};
use crate::resolver::{Navigation, SessionResolver};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup` and `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Query string for `GET /auth/resolve`.
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    /// The page being entered, e.g. `/auth/callback` or `/startup/jobs`.
    #[serde(default)]
    pub path: Option<String>,
    /// Role requested on the callback URL.
    #[serde(default)]
    pub role: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Create an account. The role is assigned later, by resolution.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SessionUser>>)> {
    validate_body(&input)?;
    let user = state
        .identity
        .sign_up(&input.email, &input.password, UserMetadata::default())
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<CredentialsRequest>,
) -> AppResult<Json<AuthSession>> {
    let session = state
        .identity
        .sign_in_with_password(&input.email, &input.password)
        .await?;
    tracing::info!(user_id = %session.user.id, "User logged in");
    Ok(Json(session))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a refresh token for new access + refresh tokens.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthSession>> {
    let session = state.identity.refresh_session(&input.refresh_token).await?;
    Ok(Json(session))
}

/// POST /api/v1/auth/logout
///
/// Revoke the caller's sessions. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    state.identity.sign_out(&auth.access_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/session
///
/// The caller's identity with the profile row for their role.
pub async fn session(current: CurrentIdentity) -> AppResult<Json<DataResponse<UserIdentity>>> {
    Ok(Json(DataResponse {
        data: current.identity,
    }))
}

/// GET /api/v1/auth/resolve?path=&role=
///
/// Decide where a client entering `path` should go. Works with or without a
/// session; on first visit after signup it assigns `role`.
pub async fn resolve(
    State(state): State<AppState>,
    OptionalBearer(token): OptionalBearer,
    Query(query): Query<ResolveQuery>,
) -> AppResult<Json<DataResponse<Navigation>>> {
    let path = query.path.as_deref().unwrap_or(upstart_core::resolver::CALLBACK_PATH);
    let navigation = SessionResolver::new(state.identity.as_ref(), state.profiles.as_ref())
        .resolve(token.as_deref(), query.role.as_deref(), path)
        .await?;
    Ok(Json(DataResponse { data: navigation }))
}
