//! Repository for the `companies` table.

use sqlx::PgPool;
use upstart_core::types::UserId;

use crate::models::company::{Company, UpdateCompany};

const COLUMNS: &str = "id, company_name, description, website, industry, company_size, \
                       location, logo_url, created_at, updated_at";

pub struct CompanyRepo;

impl CompanyRepo {
    /// Return the profile row for `id`, creating an empty one if missing.
    /// Same single-statement upsert as `StudentRepo::ensure`.
    pub async fn ensure(pool: &PgPool, id: UserId) -> Result<Company, sqlx::Error> {
        let query = format!(
            "WITH inserted AS (
                INSERT INTO companies (id) VALUES ($1)
                ON CONFLICT (id) DO NOTHING
                RETURNING {COLUMNS}
             )
             SELECT {COLUMNS} FROM inserted
             UNION ALL
             SELECT {COLUMNS} FROM companies WHERE id = $1
             LIMIT 1"
        );
        let row = sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        match row {
            Some(row) => Ok(row),
            // A concurrent insert committed after this statement's snapshot
            // is invisible to the fallback branch; read it back directly.
            None => Self::find_by_id(pool, id)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    pub async fn find_by_id(pool: &PgPool, id: UserId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List startups that have finished onboarding (a company name is set),
    /// alphabetically.
    pub async fn list_named(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM companies
             WHERE company_name IS NOT NULL
             ORDER BY company_name ASC"
        );
        sqlx::query_as::<_, Company>(&query).fetch_all(pool).await
    }

    /// Update a company profile. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: UserId,
        input: &UpdateCompany,
    ) -> Result<Option<Company>, sqlx::Error> {
        let query = format!(
            "UPDATE companies SET
                company_name = COALESCE($2, company_name),
                description = COALESCE($3, description),
                website = COALESCE($4, website),
                industry = COALESCE($5, industry),
                company_size = COALESCE($6, company_size),
                location = COALESCE($7, location)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .bind(&input.company_name)
            .bind(&input.description)
            .bind(&input.website)
            .bind(&input.industry)
            .bind(&input.company_size)
            .bind(&input.location)
            .fetch_optional(pool)
            .await
    }

    /// Write the onboarding company name, creating the row if it is missing.
    pub async fn complete_onboarding(
        pool: &PgPool,
        id: UserId,
        company_name: &str,
    ) -> Result<Company, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies (id, company_name) VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET company_name = EXCLUDED.company_name
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .bind(company_name)
            .fetch_one(pool)
            .await
    }

    pub async fn set_logo_url(
        pool: &PgPool,
        id: UserId,
        url: &str,
    ) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("UPDATE companies SET logo_url = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .bind(url)
            .fetch_optional(pool)
            .await
    }
}
