//! Blog post model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use upstart_core::types::{DbId, Timestamp, UserId};

/// A row from the `blog_posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BlogPost {
    pub id: DbId,
    pub author_id: UserId,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub is_published: bool,
    pub published_at: Option<Timestamp>,
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fully resolved insert; slug and excerpt are derived by the handler.
#[derive(Debug)]
pub struct CreateBlogPost {
    pub author_id: UserId,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub is_published: bool,
}

/// DTO for updating a post. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBlogPost {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub cover_image_url: Option<String>,
}
