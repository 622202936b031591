//! Bearer-token authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use upstart_core::error::CoreError;
use upstart_core::session::SessionUser;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user, read from the identity provider using the Bearer
/// token in the `Authorization` header.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %auth.user.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The presented access token, needed for provider calls made on the
    /// user's behalf.
    pub access_token: String,
    pub user: SessionUser,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })?;

        let user = state.identity.get_user(&token).await?;

        Ok(AuthUser {
            access_token: token,
            user,
        })
    }
}

/// The Bearer token if one was sent. Never rejects a missing header.
#[derive(Debug, Clone)]
pub struct OptionalBearer(pub Option<String>);

impl FromRequestParts<AppState> for OptionalBearer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalBearer(bearer_token(parts)?))
    }
}

fn bearer_token(parts: &Parts) -> Result<Option<String>, AppError> {
    let Some(header) = parts.headers.get("authorization") else {
        return Ok(None);
    };
    let token = header
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;
    Ok(Some(token.to_string()))
}
