//! Repository for the `admins` allow-list.

use sqlx::PgPool;
use upstart_core::types::UserId;

pub struct AdminRepo;

impl AdminRepo {
    /// Whether `user_id` is on the admin allow-list.
    pub async fn is_admin(pool: &PgPool, user_id: UserId) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM admins WHERE user_id = $1)")
                .bind(user_id)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// Add a user to the allow-list. Adding an existing admin is a no-op.
    pub async fn grant(pool: &PgPool, user_id: UserId) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO admins (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Remove a user from the allow-list. Returns `true` if a row was removed.
    pub async fn revoke(pool: &PgPool, user_id: UserId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM admins WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
