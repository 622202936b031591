//! Job posting model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use upstart_core::types::{DbId, Timestamp, UserId};

/// A row from the `jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub company_id: UserId,
    pub title: String,
    pub description: String,
    pub job_type: String,
    pub location: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub skills: serde_json::Value,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A job joined with the posting company's public fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JobListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: Job,
    pub company_name: Option<String>,
    pub company_logo_url: Option<String>,
}

/// DTO for creating a job. `company_id` comes from the authenticated user.
#[derive(Debug, Deserialize)]
pub struct CreateJob {
    pub title: String,
    pub description: String,
    pub job_type: String,
    pub location: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub skills: Option<serde_json::Value>,
}

/// DTO for updating a job. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateJob {
    pub title: Option<String>,
    pub description: Option<String>,
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub skills: Option<serde_json::Value>,
}
