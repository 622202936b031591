//! Route definitions for `/onboarding`.

use axum::routing::get;
use axum::Router;

use crate::handlers::onboarding;
use crate::state::AppState;

/// Routes mounted at `/onboarding`.
///
/// ```text
/// GET  /  -> status (where should the caller be?)
/// POST /  -> submit
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(onboarding::status).post(onboarding::submit))
}
