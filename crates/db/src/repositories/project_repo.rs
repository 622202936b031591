//! Repository for the `projects` table.

use sqlx::PgPool;
use upstart_core::types::{DbId, UserId};

use crate::models::project::{CreateProject, Project};

const COLUMNS: &str = "id, company_id, title, description, skills, created_at, updated_at";

pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a project for `company_id`. `skills` must already be normalised.
    pub async fn create(
        pool: &PgPool,
        company_id: UserId,
        input: &CreateProject,
        skills: &serde_json::Value,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (company_id, title, description, skills)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(company_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(skills)
            .fetch_one(pool)
            .await
    }

    /// All projects, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    pub async fn list_by_company(
        pool: &PgPool,
        company_id: UserId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE company_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a project owned by `company_id`. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, company_id: UserId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
