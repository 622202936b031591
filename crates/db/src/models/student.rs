//! Student profile model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use upstart_core::types::{Timestamp, UserId};

/// A row from the `students` table. `id` is the identity user id.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Student {
    pub id: UserId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub university: Option<String>,
    pub major: Option<String>,
    pub graduation_year: Option<i32>,
    pub bio: Option<String>,
    /// JSON array of skill strings.
    pub skills: serde_json::Value,
    pub resume_url: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for updating a student profile. All fields are optional.
///
/// `skills` is accepted in any shape understood by
/// `upstart_core::skills::parse_skills` and normalised before it reaches the
/// repository.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStudent {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub university: Option<String>,
    pub major: Option<String>,
    pub graduation_year: Option<i32>,
    pub bio: Option<String>,
    pub skills: Option<serde_json::Value>,
}
