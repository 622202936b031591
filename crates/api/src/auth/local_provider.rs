//! Identity provider backed by the application's own Postgres tables.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use upstart_core::identity::{AuthSession, IdentityError, IdentityProvider};
use upstart_core::roles::Role;
use upstart_core::session::{SessionUser, UserMetadata};
use upstart_core::types::UserId;
use upstart_db::models::auth::{AuthUser, CreateAuthSession, CreateAuthUser};
use upstart_db::repositories::{AuthSessionRepo, AuthUserRepo};
use uuid::Uuid;

use super::jwt::{
    generate_access_token, generate_refresh_token, hash_refresh_token, validate_token, JwtConfig,
};
use super::password::{hash_password, verify_password};

/// Consecutive failed sign-ins before the account is locked.
pub const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Lock duration once [`MAX_FAILED_ATTEMPTS`] is reached.
pub const LOCK_DURATION_MINS: i64 = 15;

pub struct LocalIdentityProvider {
    pool: PgPool,
    jwt: JwtConfig,
}

impl LocalIdentityProvider {
    pub fn new(pool: PgPool, jwt: JwtConfig) -> Self {
        Self { pool, jwt }
    }

    fn user_id_from_token(&self, access_token: &str) -> Result<UserId, IdentityError> {
        validate_token(access_token, &self.jwt)
            .map(|claims| claims.sub)
            .map_err(|_| IdentityError::Unauthorized("Invalid or expired token".into()))
    }

    async fn load_user(&self, id: UserId) -> Result<AuthUser, IdentityError> {
        AuthUserRepo::find_by_id(&self.pool, id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| IdentityError::Unauthorized("User no longer exists".into()))
    }

    /// Issue an access token plus a fresh refresh-token session row.
    async fn issue_session(&self, user: &AuthUser) -> Result<AuthSession, IdentityError> {
        let access_token = generate_access_token(user.id, &user.email, &self.jwt).map_err(|e| {
            IdentityError::from_provider(None, format!("Token generation error: {e}"))
        })?;

        let (refresh_token, refresh_token_hash) = generate_refresh_token();
        let input = CreateAuthSession {
            user_id: user.id,
            refresh_token_hash,
            expires_at: Utc::now() + chrono::Duration::days(self.jwt.refresh_token_expiry_days),
        };
        AuthSessionRepo::create(&self.pool, &input)
            .await
            .map_err(store_error)?;

        Ok(AuthSession {
            access_token,
            refresh_token,
            expires_in: self.jwt.access_token_ttl_secs(),
            user: user.to_session_user(),
        })
    }
}

/// Emails are matched case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn store_error(err: sqlx::Error) -> IdentityError {
    tracing::error!(error = %err, "Identity store error");
    IdentityError::from_provider(None, "Identity store unavailable")
}

fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db)
            if db.code().as_deref() == Some("23505") && db.constraint() == Some(constraint)
    )
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn get_user(&self, access_token: &str) -> Result<SessionUser, IdentityError> {
        let id = self.user_id_from_token(access_token)?;
        Ok(self.load_user(id).await?.to_session_user())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, IdentityError> {
        let user = AuthUserRepo::find_by_email(&self.pool, &normalize_email(email))
            .await
            .map_err(store_error)?
            .ok_or(IdentityError::InvalidCredentials)?;

        if user.locked_until.is_some_and(|until| until > Utc::now()) {
            tracing::warn!(user_id = %user.id, "Sign-in attempt on locked account");
            return Err(IdentityError::RateLimited(
                "Too many failed sign-in attempts".into(),
            ));
        }

        let valid = verify_password(password, &user.password_hash).map_err(|e| {
            IdentityError::from_provider(None, format!("Password verification error: {e}"))
        })?;

        if !valid {
            let failures = AuthUserRepo::increment_failed_login(&self.pool, user.id)
                .await
                .map_err(store_error)?;
            if failures >= MAX_FAILED_ATTEMPTS {
                let until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
                AuthUserRepo::lock_account(&self.pool, user.id, until)
                    .await
                    .map_err(store_error)?;
                tracing::warn!(user_id = %user.id, failures, "Account locked");
            }
            return Err(IdentityError::InvalidCredentials);
        }

        AuthUserRepo::record_successful_sign_in(&self.pool, user.id)
            .await
            .map_err(store_error)?;
        self.issue_session(&user).await
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: UserMetadata,
    ) -> Result<SessionUser, IdentityError> {
        let password_hash = hash_password(password).map_err(|e| {
            IdentityError::from_provider(None, format!("Password hashing error: {e}"))
        })?;

        let input = CreateAuthUser {
            id: Uuid::new_v4(),
            email: normalize_email(email),
            password_hash,
            user_metadata: metadata.to_json(),
        };

        match AuthUserRepo::create(&self.pool, &input).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "User signed up");
                Ok(user.to_session_user())
            }
            Err(e) if is_unique_violation(&e, "uq_auth_users_email") => {
                Err(IdentityError::AlreadyRegistered)
            }
            Err(e) => Err(store_error(e)),
        }
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, IdentityError> {
        let hash = hash_refresh_token(refresh_token);
        let session = AuthSessionRepo::find_active_by_hash(&self.pool, &hash)
            .await
            .map_err(store_error)?
            .ok_or_else(|| IdentityError::Unauthorized("Invalid or expired refresh token".into()))?;

        // Rotation: a refresh token is single-use.
        let revoked = AuthSessionRepo::revoke(&self.pool, session.id)
            .await
            .map_err(store_error)?;
        if !revoked {
            return Err(IdentityError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ));
        }

        let user = self.load_user(session.user_id).await?;
        self.issue_session(&user).await
    }

    async fn update_user_metadata(
        &self,
        access_token: &str,
        metadata: UserMetadata,
    ) -> Result<SessionUser, IdentityError> {
        let id = self.user_id_from_token(access_token)?;
        let user = AuthUserRepo::merge_metadata(&self.pool, id, &metadata.to_json())
            .await
            .map_err(store_error)?
            .ok_or_else(|| IdentityError::Unauthorized("User no longer exists".into()))?;
        Ok(user.to_session_user())
    }

    async fn assign_role_if_unset(
        &self,
        access_token: &str,
        role: Role,
    ) -> Result<Option<SessionUser>, IdentityError> {
        let id = self.user_id_from_token(access_token)?;
        let patch = UserMetadata::new_role(role).to_json();
        match AuthUserRepo::merge_metadata_if_roleless(&self.pool, id, &patch)
            .await
            .map_err(store_error)?
        {
            Some(user) => Ok(Some(user.to_session_user())),
            None => {
                // Distinguish "role already set" from a deleted user.
                self.load_user(id).await?;
                Ok(None)
            }
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        let id = self.user_id_from_token(access_token)?;
        let revoked = AuthSessionRepo::revoke_all_for_user(&self.pool, id)
            .await
            .map_err(store_error)?;
        tracing::info!(user_id = %id, revoked, "User signed out");
        Ok(())
    }
}
