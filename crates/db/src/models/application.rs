//! Job application model, DTOs and joined views.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use upstart_core::types::{DbId, Timestamp, UserId};

/// A row from the `applications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Application {
    pub id: DbId,
    pub job_id: DbId,
    pub student_id: UserId,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for applying to a job. `job_id` and `student_id` come from the path
/// and the authenticated user.
#[derive(Debug, Default, Deserialize)]
pub struct CreateApplication {
    pub cover_letter: Option<String>,
    /// Falls back to the resume on the student's profile when omitted.
    pub resume_url: Option<String>,
}

/// Flat join row: application + job title + applicant fields.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicantRow {
    #[sqlx(flatten)]
    pub application: Application,
    pub job_title: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub university: Option<String>,
    pub major: Option<String>,
    pub graduation_year: Option<i32>,
    pub skills: serde_json::Value,
    pub avatar_url: Option<String>,
}

/// Summary of the job an application targets.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub id: DbId,
    pub title: String,
}

/// Public fields of the applying student.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicantSummary {
    pub id: UserId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub university: Option<String>,
    pub major: Option<String>,
    pub graduation_year: Option<i32>,
    pub skills: serde_json::Value,
    pub avatar_url: Option<String>,
}

/// An application as seen by the hiring startup.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationWithApplicant {
    #[serde(flatten)]
    pub application: Application,
    pub job: JobSummary,
    pub student: ApplicantSummary,
}

impl From<ApplicantRow> for ApplicationWithApplicant {
    fn from(row: ApplicantRow) -> Self {
        Self {
            job: JobSummary {
                id: row.application.job_id,
                title: row.job_title,
            },
            student: ApplicantSummary {
                id: row.application.student_id,
                first_name: row.first_name,
                last_name: row.last_name,
                university: row.university,
                major: row.major,
                graduation_year: row.graduation_year,
                skills: row.skills,
                avatar_url: row.avatar_url,
            },
            application: row.application,
        }
    }
}

/// An application as seen by the applying student.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApplicationWithJob {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: Application,
    pub job_title: String,
    pub job_is_active: bool,
    pub company_name: Option<String>,
}
