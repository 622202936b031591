use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Default one-week lifetime of the legacy `user` cookie.
pub const DEFAULT_LEGACY_COOKIE_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 7;

/// Which identity provider implementation to run against.
#[derive(Debug, Clone)]
pub enum IdentityBackend {
    /// Built-in provider over the `auth_users` / `auth_sessions` tables.
    Local(JwtConfig),
    /// Remote GoTrue-compatible auth server.
    GoTrue { url: String, anon_key: String },
}

/// Which blob store implementation to run against.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// Files under `upload_dir`, served at `/uploads`.
    Local { upload_dir: PathBuf },
    /// Remote Supabase-Storage-compatible object API.
    Supabase { url: String, service_key: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub identity: IdentityBackend,
    pub storage: StorageBackend,
    /// Externally visible base URL, used to build local upload URLs.
    pub public_base_url: String,
    /// `Max-Age` of the legacy `user` cookie, in seconds.
    pub legacy_cookie_max_age_secs: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                      |
    /// |------------------------------|------------------------------|
    /// | `HOST`                       | `0.0.0.0`                    |
    /// | `PORT`                       | `3000`                       |
    /// | `CORS_ORIGINS`               | `http://localhost:3001`      |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                         |
    /// | `IDENTITY_BACKEND`           | `local` (`local`, `gotrue`)  |
    /// | `STORAGE_BACKEND`            | `local` (`local`, `supabase`)|
    /// | `SUPABASE_URL`               | required for remote backends |
    /// | `SUPABASE_ANON_KEY`          | required for `gotrue`        |
    /// | `SUPABASE_SERVICE_KEY`       | required for `supabase`      |
    /// | `UPLOAD_DIR`                 | `storage/uploads`            |
    /// | `PUBLIC_BASE_URL`            | `http://localhost:{PORT}`    |
    /// | `LEGACY_COOKIE_MAX_AGE_SECS` | `604800`                     |
    ///
    /// The local identity backend also reads the `JWT_*` variables, see
    /// [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on malformed numbers, unknown backends, or a missing variable
    /// required by the selected backend.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3001".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let identity = match std::env::var("IDENTITY_BACKEND")
            .unwrap_or_else(|_| "local".into())
            .as_str()
        {
            "local" => IdentityBackend::Local(JwtConfig::from_env()),
            "gotrue" => IdentityBackend::GoTrue {
                url: required("SUPABASE_URL"),
                anon_key: required("SUPABASE_ANON_KEY"),
            },
            other => panic!("IDENTITY_BACKEND must be 'local' or 'gotrue', got '{other}'"),
        };

        let storage = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".into())
            .as_str()
        {
            "local" => StorageBackend::Local {
                upload_dir: std::env::var("UPLOAD_DIR")
                    .unwrap_or_else(|_| "storage/uploads".into())
                    .into(),
            },
            "supabase" => StorageBackend::Supabase {
                url: required("SUPABASE_URL"),
                service_key: required("SUPABASE_SERVICE_KEY"),
            },
            other => panic!("STORAGE_BACKEND must be 'local' or 'supabase', got '{other}'"),
        };

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"));

        let legacy_cookie_max_age_secs: i64 = std::env::var("LEGACY_COOKIE_MAX_AGE_SECS")
            .unwrap_or_else(|_| DEFAULT_LEGACY_COOKIE_MAX_AGE_SECS.to_string())
            .parse()
            .expect("LEGACY_COOKIE_MAX_AGE_SECS must be a valid i64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            identity,
            storage,
            public_base_url,
            legacy_cookie_max_age_secs,
        }
    }
}

fn required(name: &str) -> String {
    let value = std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set"));
    assert!(!value.is_empty(), "{name} must not be empty");
    value
}
