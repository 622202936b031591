//! Repository for the `students` table.

use sqlx::PgPool;
use upstart_core::types::UserId;

use crate::models::student::{Student, UpdateStudent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, university, major, graduation_year, bio, \
                       skills, resume_url, avatar_url, created_at, updated_at";

pub struct StudentRepo;

impl StudentRepo {
    /// Return the profile row for `id`, creating an empty one if missing.
    ///
    /// A single statement: the CTE inserts with `DO NOTHING` and the fallback
    /// branch reads the pre-existing row, so repeated calls never duplicate
    /// or touch an existing profile.
    pub async fn ensure(pool: &PgPool, id: UserId) -> Result<Student, sqlx::Error> {
        let query = format!(
            "WITH inserted AS (
                INSERT INTO students (id) VALUES ($1)
                ON CONFLICT (id) DO NOTHING
                RETURNING {COLUMNS}
             )
             SELECT {COLUMNS} FROM inserted
             UNION ALL
             SELECT {COLUMNS} FROM students WHERE id = $1
             LIMIT 1"
        );
        let row = sqlx::query_as::<_, Student>(&query)
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

    pub async fn find_by_id(pool: &PgPool, id: UserId) -> Result<Option<Student>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE id = $1");
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a student profile. Only non-`None` fields in `input` are applied.
    ///
    /// `skills` must already be normalised by the caller.
    pub async fn update(
        pool: &PgPool,
        id: UserId,
        input: &UpdateStudent,
    ) -> Result<Option<Student>, sqlx::Error> {
        let query = format!(
            "UPDATE students SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                university = COALESCE($4, university),
                major = COALESCE($5, major),
                graduation_year = COALESCE($6, graduation_year),
                bio = COALESCE($7, bio),
                skills = COALESCE($8, skills)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.university)
            .bind(&input.major)
            .bind(input.graduation_year)
            .bind(&input.bio)
            .bind(&input.skills)
            .fetch_optional(pool)
            .await
    }

    /// Write the onboarding name fields, creating the row if it is missing.
    pub async fn complete_onboarding(
        pool: &PgPool,
        id: UserId,
        first_name: &str,
        last_name: &str,
    ) -> Result<Student, sqlx::Error> {
        let query = format!(
            "INSERT INTO students (id, first_name, last_name) VALUES ($1, $2, $3)
             ON CONFLICT (id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .bind(first_name)
            .bind(last_name)
            .fetch_one(pool)
            .await
    }

    pub async fn set_avatar_url(
        pool: &PgPool,
        id: UserId,
        url: &str,
    ) -> Result<Option<Student>, sqlx::Error> {
        let query = format!("UPDATE students SET avatar_url = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .bind(url)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_resume_url(
        pool: &PgPool,
        id: UserId,
        url: &str,
    ) -> Result<Option<Student>, sqlx::Error> {
        let query = format!("UPDATE students SET resume_url = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .bind(url)
            .fetch_optional(pool)
            .await
    }
}
