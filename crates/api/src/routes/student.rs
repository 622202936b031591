//! Route definitions for the student area.

use axum::routing::get;
use axum::Router;

use crate::handlers::{applications, dashboard, profiles};
use crate::state::AppState;

/// Routes mounted at `/student`.
///
/// ```text
/// GET /profile       -> get_student_profile
/// PUT /profile       -> update_student_profile
/// GET /applications  -> list_for_student
/// GET /dashboard     -> student
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(profiles::get_student_profile).put(profiles::update_student_profile),
        )
        .route("/applications", get(applications::list_for_student))
        .route("/dashboard", get(dashboard::student))
}

/// Routes mounted at `/students`.
///
/// ```text
/// GET /{id}  -> get_student (startups only)
/// ```
pub fn directory_router() -> Router<AppState> {
    Router::new().route("/{id}", get(profiles::get_student))
}
