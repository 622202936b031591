//! Un-versioned endpoints kept for older clients.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::legacy;
use crate::state::AppState;

/// Routes mounted at the root, outside `/api/v1`.
///
/// ```text
/// POST /api/auth/signup  -> signup  ({message} / {error})
/// POST /api/auth/login   -> login   (sets the `user` cookie)
/// GET  /api/jobs         -> list_jobs      (bare array)
/// GET  /api/projects     -> list_projects  (bare array)
/// GET  /api/startups     -> list_startups  (bare array)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(legacy::signup))
        .route("/api/auth/login", post(legacy::login))
        .route("/api/jobs", get(legacy::list_jobs))
        .route("/api/projects", get(legacy::list_projects))
        .route("/api/startups", get(legacy::list_startups))
}
