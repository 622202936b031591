//! Shared response envelope types for API handlers.
//!
//! Versioned API responses use a `{ "data": ... }` envelope. Use
//! [`DataResponse`] instead of ad-hoc `serde_json::json!({ "data": ... })`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "message": ... }` body used by the un-versioned auth endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
