//! Repository for the `auth_users` table (built-in identity provider).

use sqlx::PgPool;
use upstart_core::roles::{METADATA_ROLE, ROLE_STARTUP, ROLE_STUDENT};
use upstart_core::types::{Timestamp, UserId};

use crate::models::auth::{AuthUser, CreateAuthUser};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, user_metadata, failed_login_count, \
                       locked_until, last_sign_in_at, created_at, updated_at";

pub struct AuthUserRepo;

impl AuthUserRepo {
    /// Insert a new identity user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAuthUser) -> Result<AuthUser, sqlx::Error> {
        let query = format!(
            "INSERT INTO auth_users (id, email, password_hash, user_metadata)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuthUser>(&query)
            .bind(input.id)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.user_metadata)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: UserId) -> Result<Option<AuthUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM auth_users WHERE id = $1");
        sqlx::query_as::<_, AuthUser>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email. Emails are stored lowercased.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<AuthUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM auth_users WHERE email = $1");
        sqlx::query_as::<_, AuthUser>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Shallow-merge `patch` into `user_metadata` (JSONB `||`).
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn merge_metadata(
        pool: &PgPool,
        id: UserId,
        patch: &serde_json::Value,
    ) -> Result<Option<AuthUser>, sqlx::Error> {
        let query = format!(
            "UPDATE auth_users SET user_metadata = user_metadata || $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuthUser>(&query)
            .bind(id)
            .bind(patch)
            .fetch_optional(pool)
            .await
    }

    /// Merge `patch` only if `user_metadata` holds no recognised role.
    ///
    /// The check and the write are one statement, so concurrent callers
    /// cannot both succeed. Returns `None` when the user already has a role
    /// (or does not exist).
    pub async fn merge_metadata_if_roleless(
        pool: &PgPool,
        id: UserId,
        patch: &serde_json::Value,
    ) -> Result<Option<AuthUser>, sqlx::Error> {
        let query = format!(
            "UPDATE auth_users SET user_metadata = user_metadata || $2
             WHERE id = $1
               AND COALESCE(user_metadata->>'{METADATA_ROLE}', '') NOT IN ($3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuthUser>(&query)
            .bind(id)
            .bind(patch)
            .bind(ROLE_STUDENT)
            .bind(ROLE_STARTUP)
            .fetch_optional(pool)
            .await
    }

    /// Increment the failed sign-in counter, returning the new count.
    pub async fn increment_failed_login(pool: &PgPool, id: UserId) -> Result<i32, sqlx::Error> {
        let (count,): (i32,) = sqlx::query_as(
            "UPDATE auth_users SET failed_login_count = failed_login_count + 1
             WHERE id = $1
             RETURNING failed_login_count",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Lock sign-in for a user until the specified timestamp.
    pub async fn lock_account(pool: &PgPool, id: UserId, until: Timestamp) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE auth_users SET locked_until = $2 WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Record a successful sign-in: reset the failure counter, clear the lock
    /// and stamp `last_sign_in_at`.
    pub async fn record_successful_sign_in(pool: &PgPool, id: UserId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE auth_users SET
                failed_login_count = 0,
                locked_until = NULL,
                last_sign_in_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
