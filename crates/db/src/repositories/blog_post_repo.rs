//! Repository for the `blog_posts` table.

use sqlx::PgPool;
use upstart_core::types::DbId;

use crate::models::blog_post::{BlogPost, CreateBlogPost, UpdateBlogPost};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, author_id, title, slug, excerpt, content, cover_image_url, \
                       is_published, published_at, is_featured, created_at, updated_at";

pub struct BlogPostRepo;

impl BlogPostRepo {
    pub async fn create(pool: &PgPool, input: &CreateBlogPost) -> Result<BlogPost, sqlx::Error> {
        let query = format!(
            "INSERT INTO blog_posts (author_id, title, slug, excerpt, content, cover_image_url, \
                                     is_published, published_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, CASE WHEN $7 THEN NOW() END)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(input.author_id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.excerpt)
            .bind(&input.content)
            .bind(&input.cover_image_url)
            .bind(input.is_published)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BlogPost>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM blog_posts WHERE id = $1");
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<BlogPost>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM blog_posts WHERE slug = $1");
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Whether any post other than `exclude_id` already uses `slug`.
    pub async fn slug_taken(
        pool: &PgPool,
        slug: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let (taken,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM blog_posts WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
        Ok(taken)
    }

    /// List posts, featured first, then newest publication first.
    ///
    /// Unpublished posts are only included when `include_unpublished` is set.
    pub async fn list(pool: &PgPool, include_unpublished: bool) -> Result<Vec<BlogPost>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM blog_posts
             WHERE is_published OR $1
             ORDER BY is_featured DESC, COALESCE(published_at, created_at) DESC"
        );
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(include_unpublished)
            .fetch_all(pool)
            .await
    }

    /// The featured post, if it is published.
    pub async fn find_featured(pool: &PgPool) -> Result<Option<BlogPost>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM blog_posts WHERE is_featured AND is_published LIMIT 1"
        );
        sqlx::query_as::<_, BlogPost>(&query).fetch_optional(pool).await
    }

    /// Update a post. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBlogPost,
    ) -> Result<Option<BlogPost>, sqlx::Error> {
        let query = format!(
            "UPDATE blog_posts SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                excerpt = COALESCE($4, excerpt),
                content = COALESCE($5, content),
                cover_image_url = COALESCE($6, cover_image_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.excerpt)
            .bind(&input.content)
            .bind(&input.cover_image_url)
            .fetch_optional(pool)
            .await
    }

    /// Publish or unpublish a post. `published_at` is stamped on first publish
    /// and kept afterwards.
    pub async fn set_published(
        pool: &PgPool,
        id: DbId,
        is_published: bool,
    ) -> Result<Option<BlogPost>, sqlx::Error> {
        let query = format!(
            "UPDATE blog_posts SET
                is_published = $2,
                published_at = CASE WHEN $2 THEN COALESCE(published_at, NOW()) ELSE published_at END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(id)
            .bind(is_published)
            .fetch_optional(pool)
            .await
    }

    /// Feature or unfeature a post.
    ///
    /// Featuring un-marks any other featured post in the same transaction;
    /// `uq_blog_posts_single_featured` rejects a concurrent second feature.
    /// Nothing is changed if the post does not exist.
    pub async fn set_featured(
        pool: &PgPool,
        id: DbId,
        is_featured: bool,
    ) -> Result<Option<BlogPost>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if is_featured {
            sqlx::query("UPDATE blog_posts SET is_featured = false WHERE is_featured AND id <> $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        let query = format!(
            "UPDATE blog_posts SET is_featured = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let result = sqlx::query_as::<_, BlogPost>(&query)
            .bind(id)
            .bind(is_featured)
            .fetch_optional(&mut *tx)
            .await?;

        if result.is_some() {
            tx.commit().await?;
        }
        Ok(result)
    }

    /// Delete a post. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of featured rows; used to check the single-featured invariant.
    pub async fn count_featured(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM blog_posts WHERE is_featured")
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
