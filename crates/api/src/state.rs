use std::sync::Arc;

use upstart_core::identity::IdentityProvider;
use upstart_core::storage::BlobStore;
use upstart_db::profile_store::ProfileStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the collaborators sit behind `Arc` and the pool is
/// already reference-counted.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: upstart_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Session issuer and holder of the per-user role metadata.
    pub identity: Arc<dyn IdentityProvider>,
    /// Student / company profile rows.
    pub profiles: Arc<dyn ProfileStore>,
    /// Uploaded files.
    pub blobs: Arc<dyn BlobStore>,
}
