use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use upstart_core::error::CoreError;
use upstart_core::identity::{IdentityError, RATE_LIMIT_MESSAGE};
use upstart_core::resolver::ROLE_NOT_FOUND_MESSAGE;
use upstart_core::storage::BlobError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `upstart_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A failure reported by the identity provider.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// A failure reported by the blob store.
    #[error(transparent)]
    Blob(#[from] BlobError),

    /// The session has no role and none was supplied. Terminal.
    #[error("{ROLE_NOT_FOUND_MESSAGE}")]
    RoleNotFound,

    /// The caller must navigate elsewhere before this resource is usable
    /// (e.g. onboarding is incomplete, or the path belongs to the other role).
    #[error("Redirect to {0}")]
    Redirect(String),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Collaborator errors ---
            AppError::Identity(err) => classify_identity_error(err),
            AppError::Blob(err) => match err {
                BlobError::InvalidPath(path) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    format!("Invalid object path '{path}'"),
                ),
                other => {
                    tracing::error!(error = %other, "Blob store error");
                    internal()
                }
            },

            // --- Resolver outcomes ---
            AppError::RoleNotFound => (
                StatusCode::BAD_REQUEST,
                "ROLE_NOT_FOUND",
                ROLE_NOT_FOUND_MESSAGE.to_string(),
            ),
            AppError::Redirect(location) => {
                let body = json!({
                    "error": "Navigation required",
                    "code": "REDIRECT",
                    "redirect": location,
                });
                return (StatusCode::FORBIDDEN, axum::Json(body)).into_response();
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

/// Map an identity-provider failure to an HTTP status, error code, and message.
///
/// Rate limiting is checked first so that throttling reported as a generic
/// provider error still surfaces as 429.
fn classify_identity_error(err: &IdentityError) -> (StatusCode, &'static str, String) {
    if err.is_rate_limited() {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            "RATE_LIMITED",
            RATE_LIMIT_MESSAGE.to_string(),
        );
    }
    match err {
        IdentityError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "Invalid email or password".to_string(),
        ),
        IdentityError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        IdentityError::AlreadyRegistered => (
            StatusCode::CONFLICT,
            "CONFLICT",
            "User already registered".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Identity provider error");
            internal()
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        conflict_message(constraint),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

fn conflict_message(constraint: &str) -> String {
    match constraint {
        "uq_applications_job_student" => "You have already applied to this job".to_string(),
        "uq_blog_posts_slug" => "A post with this slug already exists".to_string(),
        "uq_blog_posts_single_featured" => "Another post was featured concurrently".to_string(),
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn rate_limits_render_as_429() {
        let (status, body) =
            render(IdentityError::from_provider(Some(500), "Too Many Requests").into()).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["code"], "RATE_LIMITED");
        assert_eq!(body["error"], RATE_LIMIT_MESSAGE);
    }

    #[tokio::test]
    async fn role_not_found_is_terminal_400() {
        let (status, body) = render(AppError::RoleNotFound).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Role not found");
        assert!(body.get("redirect").is_none());
    }

    #[tokio::test]
    async fn redirect_carries_location() {
        let (status, body) = render(AppError::Redirect("/onboarding".into())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "REDIRECT");
        assert_eq!(body["redirect"], "/onboarding");
    }

    #[tokio::test]
    async fn provider_failures_are_sanitized() {
        let (status, body) = render(
            IdentityError::Provider {
                status: Some(500),
                message: "connection string leaked".into(),
            }
            .into(),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], INTERNAL_MESSAGE);
    }
}
