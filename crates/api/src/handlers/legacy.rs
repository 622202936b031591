//! Un-versioned endpoints kept for older clients.
//!
//! `/api/auth/*` answer with `{ "message" }` or `{ "error" }` bodies rather
//! than the versioned envelope, and login hands the user record back in an
//! httpOnly `user` cookie. That cookie is independent of the provider
//! session. The `GET` lists return bare JSON arrays.

use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use cookie::time::Duration;
use cookie::{Cookie, SameSite};
use serde::Deserialize;
use serde_json::json;
use upstart_core::identity::{IdentityError, RATE_LIMIT_MESSAGE};
use upstart_core::session::{SessionUser, UserMetadata};
use upstart_db::models::company::Company;
use upstart_db::models::job::JobListing;
use upstart_db::models::project::Project;
use upstart_db::repositories::{CompanyRepo, JobRepo, ProjectRepo, UserRepo};

use crate::error::AppResult;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Name of the cookie set by legacy login.
pub const USER_COOKIE: &str = "user";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LegacyCredentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LegacyCredentials {
    fn required(&self) -> Result<(&str, &str), LegacyError> {
        match (self.email.as_deref(), self.password.as_deref()) {
            (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Ok((email.trim(), password))
            }
            _ => Err(LegacyError::new(
                StatusCode::BAD_REQUEST,
                "Email and password are required",
            )),
        }
    }
}

/// `{ "error": ... }` response used by the legacy auth endpoints.
#[derive(Debug)]
pub struct LegacyError {
    status: StatusCode,
    message: String,
}

impl LegacyError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    fn rate_limited(err: &IdentityError) -> Self {
        tracing::warn!(error = %err, "Legacy auth request rate limited");
        Self::new(StatusCode::TOO_MANY_REQUESTS, RATE_LIMIT_MESSAGE)
    }
}

impl IntoResponse for LegacyError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<LegacyCredentials>,
) -> Result<Json<MessageResponse>, LegacyError> {
    let (email, password) = input.required()?;

    let user = state
        .identity
        .sign_up(email, password, UserMetadata::default())
        .await
        .map_err(|e| match e {
            e if e.is_rate_limited() => LegacyError::rate_limited(&e),
            IdentityError::Provider { status: None, .. } => {
                tracing::error!(error = %e, "Legacy signup failed");
                LegacyError::internal()
            }
            other => LegacyError::new(StatusCode::BAD_REQUEST, other.to_string()),
        })?;

    UserRepo::upsert(&state.pool, user.id, &user.email)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "Failed to mirror user row");
            LegacyError::internal()
        })?;

    Ok(Json(MessageResponse {
        message: "User created successfully".into(),
    }))
}

/// POST /api/auth/login
///
/// On success sets the `user` cookie (httpOnly, `Path=/`) holding the JSON
/// user record.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LegacyCredentials>,
) -> Result<Response, LegacyError> {
    let (email, password) = input.required()?;

    let session = state
        .identity
        .sign_in_with_password(email, password)
        .await
        .map_err(|e| match e {
            e if e.is_rate_limited() => LegacyError::rate_limited(&e),
            IdentityError::InvalidCredentials | IdentityError::Unauthorized(_) => {
                LegacyError::new(StatusCode::UNAUTHORIZED, e.to_string())
            }
            other => {
                tracing::error!(error = %other, "Legacy login failed");
                LegacyError::internal()
            }
        })?;

    let cookie = user_cookie(&session.user, state.config.legacy_cookie_max_age_secs)
        .map_err(|_| LegacyError::internal())?;

    let mut response = Json(MessageResponse {
        message: "Login successful".into(),
    })
    .into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

/// Build the `Set-Cookie` value for the legacy `user` cookie. The JSON
/// value is percent-encoded.
pub fn user_cookie(user: &SessionUser, max_age_secs: i64) -> Result<HeaderValue, String> {
    let json = serde_json::to_string(user).map_err(|e| e.to_string())?;
    let cookie = Cookie::build((USER_COOKIE, json))
        .http_only(true)
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .same_site(SameSite::Lax)
        .build();
    HeaderValue::from_str(&cookie.encoded().to_string()).map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// Bare lists
// ---------------------------------------------------------------------------

/// GET /api/jobs
pub async fn list_jobs(State(state): State<AppState>) -> AppResult<Json<Vec<JobListing>>> {
    Ok(Json(JobRepo::list_active(&state.pool).await?))
}

/// GET /api/projects
pub async fn list_projects(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    Ok(Json(ProjectRepo::list(&state.pool).await?))
}

/// GET /api/startups
pub async fn list_startups(State(state): State<AppState>) -> AppResult<Json<Vec<Company>>> {
    Ok(Json(CompanyRepo::list_named(&state.pool).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use upstart_core::roles::Role;
    use uuid::Uuid;

    #[test]
    fn cookie_is_http_only_with_max_age() {
        let user = SessionUser {
            id: Uuid::nil(),
            email: "ada@example.com".into(),
            role: Some(Role::Student),
            onboarding_status: None,
        };
        let cookie = user_cookie(&user, 604_800).unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with("user=%7B"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(cookie.contains("SameSite=Lax"));

        let value = cookie
            .split(';')
            .next()
            .and_then(|pair| pair.strip_prefix("user="))
            .unwrap();
        assert!(!value.contains('"') && !value.contains(' ') && !value.contains(','));
        let parsed = Cookie::parse_encoded(cookie.to_string()).unwrap();
        let decoded: SessionUser = serde_json::from_str(parsed.value()).unwrap();
        assert_eq!(decoded, user);
    }

    #[test]
    fn missing_credentials_are_rejected() {
        let creds = LegacyCredentials {
            email: Some("a@b.co".into()),
            password: None,
        };
        assert!(creds.required().is_err());
    }
}
