//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod admin_repo;
pub mod application_repo;
pub mod auth_session_repo;
pub mod auth_user_repo;
pub mod blog_post_repo;
pub mod company_repo;
pub mod job_repo;
pub mod project_repo;
pub mod student_repo;
pub mod user_repo;

pub use admin_repo::AdminRepo;
pub use application_repo::ApplicationRepo;
pub use auth_session_repo::AuthSessionRepo;
pub use auth_user_repo::AuthUserRepo;
pub use blog_post_repo::BlogPostRepo;
pub use company_repo::CompanyRepo;
pub use job_repo::JobRepo;
pub use project_repo::ProjectRepo;
pub use student_repo::StudentRepo;
pub use user_repo::UserRepo;
