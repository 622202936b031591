//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod application;
pub mod auth;
pub mod blog_post;
pub mod company;
pub mod job;
pub mod project;
pub mod student;
pub mod user;
