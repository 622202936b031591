//! Repository for the `jobs` table.

use sqlx::PgPool;
use upstart_core::types::{DbId, UserId};

use crate::models::job::{CreateJob, Job, JobListing, UpdateJob};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, title, description, job_type, location, salary_min, \
                       salary_max, skills, is_active, created_at, updated_at";

/// Job columns qualified with the `j` alias plus the company fields, for listings.
const LISTING_COLUMNS: &str = "j.id, j.company_id, j.title, j.description, j.job_type, \
                               j.location, j.salary_min, j.salary_max, j.skills, j.is_active, \
                               j.created_at, j.updated_at, \
                               c.company_name, c.logo_url AS company_logo_url";

pub struct JobRepo;

impl JobRepo {
    /// Insert a job for `company_id`. `skills` must already be normalised.
    pub async fn create(
        pool: &PgPool,
        company_id: UserId,
        input: &CreateJob,
        skills: &serde_json::Value,
    ) -> Result<Job, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs (company_id, title, description, job_type, location, \
                               salary_min, salary_max, skills)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(company_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.job_type)
            .bind(&input.location)
            .bind(input.salary_min)
            .bind(input.salary_max)
            .bind(skills)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A single job with its company fields.
    pub async fn find_listing(pool: &PgPool, id: DbId) -> Result<Option<JobListing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS}
             FROM jobs j JOIN companies c ON c.id = j.company_id
             WHERE j.id = $1"
        );
        sqlx::query_as::<_, JobListing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All active jobs, newest first, with company fields.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<JobListing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS}
             FROM jobs j JOIN companies c ON c.id = j.company_id
             WHERE j.is_active
             ORDER BY j.created_at DESC"
        );
        sqlx::query_as::<_, JobListing>(&query).fetch_all(pool).await
    }

    /// Every job posted by a company, including inactive ones, newest first.
    pub async fn list_by_company(pool: &PgPool, company_id: UserId) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jobs WHERE company_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Update a job owned by `company_id`. Only non-`None` fields are applied.
    ///
    /// Returns `None` if the job does not exist or belongs to another company.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        company_id: UserId,
        input: &UpdateJob,
    ) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "UPDATE jobs SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                job_type = COALESCE($5, job_type),
                location = COALESCE($6, location),
                salary_min = COALESCE($7, salary_min),
                salary_max = COALESCE($8, salary_max),
                skills = COALESCE($9, skills)
             WHERE id = $1 AND company_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(company_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.job_type)
            .bind(&input.location)
            .bind(input.salary_min)
            .bind(input.salary_max)
            .bind(&input.skills)
            .fetch_optional(pool)
            .await
    }

    /// Open or close a job owned by `company_id`.
    pub async fn set_active(
        pool: &PgPool,
        id: DbId,
        company_id: UserId,
        is_active: bool,
    ) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "UPDATE jobs SET is_active = $3 WHERE id = $1 AND company_id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(company_id)
            .bind(is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a job owned by `company_id`. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, company_id: UserId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of active jobs across all companies.
    pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM jobs WHERE is_active")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
