//! Repository for the `users` table.

use sqlx::PgPool;
use upstart_core::types::UserId;

use crate::models::user::User;

const COLUMNS: &str = "id, email, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Insert or refresh the mirror row for an identity user.
    pub async fn upsert(pool: &PgPool, id: UserId, email: &str) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (id, email) VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET email = EXCLUDED.email
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(email)
            .fetch_one(pool)
            .await
    }
}
