//! Route definitions for the `/jobs` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::{applications, jobs};
use crate::state::AppState;

/// Routes mounted at `/jobs`.
///
/// ```text
/// GET    /                    -> list (active only)
/// POST   /                    -> create (startup)
/// GET    /{id}                -> get
/// PUT    /{id}                -> update (owner)
/// DELETE /{id}                -> delete (owner)
/// PATCH  /{id}/active         -> set_active (owner)
/// GET    /{id}/applications   -> list_for_job (owner)
/// POST   /{id}/applications   -> apply (student)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(jobs::list).post(jobs::create))
        .route("/{id}", get(jobs::get).put(jobs::update).delete(jobs::delete))
        .route("/{id}/active", patch(jobs::set_active))
        .route(
            "/{id}/applications",
            get(applications::list_for_job).post(applications::apply),
        )
}
