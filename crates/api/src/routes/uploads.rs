//! Route definitions for `/uploads`.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use upstart_core::storage::MAX_UPLOAD_BYTES;

use crate::handlers::uploads;
use crate::state::AppState;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Routes mounted at `/uploads`.
///
/// ```text
/// POST /{bucket}  -> upload (multipart `file`)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{bucket}", post(uploads::upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES))
}
