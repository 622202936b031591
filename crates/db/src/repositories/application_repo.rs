//! Repository for the `applications` table.

use sqlx::PgPool;
use upstart_core::types::{DbId, UserId};

use crate::models::application::{
    ApplicantRow, Application, ApplicationWithApplicant, ApplicationWithJob,
};

const COLUMNS: &str = "id, job_id, student_id, cover_letter, resume_url, created_at, updated_at";

/// Application columns qualified with the `a` alias.
const A_COLUMNS: &str = "a.id, a.job_id, a.student_id, a.cover_letter, a.resume_url, \
                         a.created_at, a.updated_at";

/// Applicant fields pulled alongside each application.
const APPLICANT_COLUMNS: &str = "j.title AS job_title, s.first_name, s.last_name, s.university, \
                                 s.major, s.graduation_year, s.skills, s.avatar_url";

pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Insert an application. A second application by the same student to the
    /// same job violates `uq_applications_job_student`.
    pub async fn create(
        pool: &PgPool,
        job_id: DbId,
        student_id: UserId,
        cover_letter: Option<&str>,
        resume_url: Option<&str>,
    ) -> Result<Application, sqlx::Error> {
        let query = format!(
            "INSERT INTO applications (job_id, student_id, cover_letter, resume_url)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(job_id)
            .bind(student_id)
            .bind(cover_letter)
            .bind(resume_url)
            .fetch_one(pool)
            .await
    }

    /// A student's own applications with job and company context, newest first.
    pub async fn list_for_student(
        pool: &PgPool,
        student_id: UserId,
    ) -> Result<Vec<ApplicationWithJob>, sqlx::Error> {
        let query = format!(
            "SELECT {A_COLUMNS}, j.title AS job_title, j.is_active AS job_is_active, c.company_name
             FROM applications a
             JOIN jobs j ON j.id = a.job_id
             JOIN companies c ON c.id = j.company_id
             WHERE a.student_id = $1
             ORDER BY a.created_at DESC"
        );
        sqlx::query_as::<_, ApplicationWithJob>(&query)
            .bind(student_id)
            .fetch_all(pool)
            .await
    }

    /// Applications to a single job, with applicant fields, newest first.
    pub async fn list_for_job(
        pool: &PgPool,
        job_id: DbId,
    ) -> Result<Vec<ApplicationWithApplicant>, sqlx::Error> {
        let query = format!(
            "SELECT {A_COLUMNS}, {APPLICANT_COLUMNS}
             FROM applications a
             JOIN jobs j ON j.id = a.job_id
             JOIN students s ON s.id = a.student_id
             WHERE a.job_id = $1
             ORDER BY a.created_at DESC"
        );
        let rows = sqlx::query_as::<_, ApplicantRow>(&query)
            .bind(job_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Applications to every job of a company, with applicant fields, newest first.
    pub async fn list_for_company(
        pool: &PgPool,
        company_id: UserId,
    ) -> Result<Vec<ApplicationWithApplicant>, sqlx::Error> {
        let query = format!(
            "SELECT {A_COLUMNS}, {APPLICANT_COLUMNS}
             FROM applications a
             JOIN jobs j ON j.id = a.job_id
             JOIN students s ON s.id = a.student_id
             WHERE j.company_id = $1
             ORDER BY a.created_at DESC"
        );
        let rows = sqlx::query_as::<_, ApplicantRow>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn count_for_student(pool: &PgPool, student_id: UserId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM applications WHERE student_id = $1")
                .bind(student_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    pub async fn count_for_company(pool: &PgPool, company_id: UserId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM applications a
             JOIN jobs j ON j.id = a.job_id
             WHERE j.company_id = $1",
        )
        .bind(company_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
