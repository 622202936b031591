//! Route definitions for the `/blog` resource.
//!
//! `{post}` is a slug on GET and a numeric id on every write.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::blog;
use crate::state::AppState;

/// Routes mounted at `/blog`.
///
/// ```text
/// GET    /                -> list (?include_unpublished=true for admins)
/// POST   /                -> create (admin)
/// GET    /featured        -> featured
/// GET    /admin-status    -> admin_status
/// GET    /{slug}          -> get_by_slug
/// PUT    /{id}            -> update (admin)
/// DELETE /{id}            -> delete (admin)
/// PUT    /{id}/publish    -> set_published (admin)
/// PUT    /{id}/feature    -> set_featured (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(blog::list).post(blog::create))
        .route("/featured", get(blog::featured))
        .route("/admin-status", get(blog::admin_status))
        .route(
            "/{post}",
            get(blog::get_by_slug).put(blog::update).delete(blog::delete),
        )
        .route("/{post}/publish", put(blog::set_published))
        .route("/{post}/feature", put(blog::set_featured))
}
