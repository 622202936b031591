//! Startup project model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use upstart_core::types::{DbId, Timestamp, UserId};

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub company_id: UserId,
    pub title: String,
    pub description: String,
    pub skills: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a project.
#[derive(Debug, Deserialize)]
pub struct CreateProject {
    pub title: String,
    pub description: String,
    pub skills: Option<serde_json::Value>,
}
