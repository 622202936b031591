//! Relational mirror of identity-provider users.

use serde::Serialize;
use sqlx::FromRow;
use upstart_core::types::{Timestamp, UserId};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
