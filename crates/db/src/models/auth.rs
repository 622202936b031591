//! Rows backing the built-in identity provider.

use sqlx::FromRow;
use upstart_core::session::{SessionUser, UserMetadata};
use upstart_core::types::{DbId, Timestamp, UserId};

/// Full row from `auth_users`.
///
/// Contains the password hash -- NEVER serialize this to API responses.
/// Convert with [`AuthUser::to_session_user`] instead.
#[derive(Debug, Clone, FromRow)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub user_metadata: serde_json::Value,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub last_sign_in_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AuthUser {
    pub fn to_session_user(&self) -> SessionUser {
        SessionUser::from_metadata(
            self.id,
            self.email.clone(),
            UserMetadata::from_json(&self.user_metadata),
        )
    }
}

/// DTO for creating an identity user.
#[derive(Debug)]
pub struct CreateAuthUser {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub user_metadata: serde_json::Value,
}

/// A row from `auth_sessions`.
#[derive(Debug, Clone, FromRow)]
pub struct AuthSession {
    pub id: DbId,
    pub user_id: UserId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a session.
#[derive(Debug)]
pub struct CreateAuthSession {
    pub user_id: UserId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
