use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use upstart_api::auth::local_provider::LocalIdentityProvider;
use upstart_api::config::{IdentityBackend, ServerConfig, StorageBackend};
use upstart_api::router::build_app_router;
use upstart_api::state::AppState;
use upstart_api::storage::LocalBlobStore;
use upstart_cloud::gotrue::GoTrueClient;
use upstart_cloud::storage::StorageClient;
use upstart_core::identity::IdentityProvider;
use upstart_core::storage::BlobStore;
use upstart_db::profile_store::PgProfileStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "upstart_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = upstart_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    upstart_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    upstart_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Collaborators ---
    let identity: Arc<dyn IdentityProvider> = match &config.identity {
        IdentityBackend::Local(jwt) => {
            tracing::info!("Using built-in identity provider");
            Arc::new(LocalIdentityProvider::new(pool.clone(), jwt.clone()))
        }
        IdentityBackend::GoTrue { url, anon_key } => {
            tracing::info!(%url, "Using remote identity provider");
            Arc::new(
                GoTrueClient::new(url, anon_key.clone()).expect("Invalid identity provider URL"),
            )
        }
    };

    let blobs: Arc<dyn BlobStore> = match &config.storage {
        StorageBackend::Local { upload_dir } => {
            tracing::info!(upload_dir = %upload_dir.display(), "Using local upload storage");
            Arc::new(LocalBlobStore::new(
                upload_dir.clone(),
                config.public_base_url.clone(),
            ))
        }
        StorageBackend::Supabase { url, service_key } => {
            tracing::info!(%url, "Using remote object storage");
            Arc::new(StorageClient::new(url, service_key.clone()).expect("Invalid storage URL"))
        }
    };

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        identity,
        profiles: Arc::new(PgProfileStore::new(pool.clone())),
        blobs,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped accepting connections, closing database pool");
    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
