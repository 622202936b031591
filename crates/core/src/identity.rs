//! Identity provider seam.
//!
//! The provider issues sessions and stores the per-user metadata blob that
//! carries the marketplace role and onboarding status. Every call returns a
//! [`Result`]; nothing is retried.

use async_trait::async_trait;
use serde::Serialize;

use crate::roles::Role;
use crate::session::{SessionUser, UserMetadata};

/// HTTP status the provider uses to signal throttling.
pub const RATE_LIMIT_STATUS: u16 = 429;

/// User-facing message shown for throttled requests.
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests. Please try again later.";

/// Tokens issued by a successful sign-in or refresh.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: SessionUser,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum IdentityError {
    /// Email/password pair rejected.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// Missing, expired or revoked token.
    #[error("Session invalid: {0}")]
    Unauthorized(String),

    /// Signup for an email that already has an account.
    #[error("User already registered")]
    AlreadyRegistered,

    /// The provider is throttling this client.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Any other provider-side or transport failure.
    #[error("Identity provider error: {message}")]
    Provider {
        status: Option<u16>,
        message: String,
    },
}

impl IdentityError {
    /// Classify a raw provider failure.
    ///
    /// Providers do not agree on how throttling is reported, so a 429 status
    /// and a message mentioning `429` or "Too Many Requests" are all treated
    /// as rate limiting.
    pub fn from_provider(status: Option<u16>, message: impl Into<String>) -> Self {
        let message = message.into();
        if status == Some(RATE_LIMIT_STATUS) || is_rate_limit_message(&message) {
            IdentityError::RateLimited(message)
        } else {
            IdentityError::Provider { status, message }
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        match self {
            IdentityError::RateLimited(_) => true,
            IdentityError::Provider { status, message } => {
                *status == Some(RATE_LIMIT_STATUS) || is_rate_limit_message(message)
            }
            _ => false,
        }
    }
}

/// Substring check for provider throttling messages.
pub fn is_rate_limit_message(message: &str) -> bool {
    message.contains("429") || message.to_ascii_lowercase().contains("too many requests")
}

/// Operations the server needs from the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Read the user behind an access token (the "session fetch").
    async fn get_user(&self, access_token: &str) -> Result<SessionUser, IdentityError>;

    /// Email/password sign-in.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, IdentityError>;

    /// Create an account. `metadata` seeds the user's metadata blob.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: UserMetadata,
    ) -> Result<SessionUser, IdentityError>;

    /// Exchange a refresh token for a new session.
    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, IdentityError>;

    /// Merge `metadata` into the user's metadata blob and return the updated user.
    async fn update_user_metadata(
        &self,
        access_token: &str,
        metadata: UserMetadata,
    ) -> Result<SessionUser, IdentityError>;

    /// Write `role` with `onboarding_status = not_started`, but only if the
    /// user has no role yet.
    ///
    /// Returns the updated user when this call made the write, or `None`
    /// when a role was already present and nothing was changed.
    async fn assign_role_if_unset(
        &self,
        access_token: &str,
        role: Role,
    ) -> Result<Option<SessionUser>, IdentityError>;

    /// Revoke the user's sessions.
    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError>;
}
