//! Route definitions for the startup area and the public startup directory.

use axum::routing::get;
use axum::Router;

use crate::handlers::{applications, dashboard, jobs, profiles, startups};
use crate::state::AppState;

/// Routes mounted at `/startup`.
///
/// ```text
/// GET /profile       -> get_startup_profile
/// PUT /profile       -> update_startup_profile
/// GET /jobs          -> list_own (including inactive)
/// GET /applications  -> list_for_startup
/// GET /dashboard     -> startup
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(profiles::get_startup_profile).put(profiles::update_startup_profile),
        )
        .route("/jobs", get(jobs::list_own))
        .route("/applications", get(applications::list_for_startup))
        .route("/dashboard", get(dashboard::startup))
}

/// Routes mounted at `/startups`.
///
/// ```text
/// GET /      -> list
/// GET /{id}  -> get (with active jobs and projects)
/// ```
pub fn directory_router() -> Router<AppState> {
    Router::new()
        .route("/", get(startups::list))
        .route("/{id}", get(startups::get))
}
