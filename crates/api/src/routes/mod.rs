pub mod auth;
pub mod blog;
pub mod health;
pub mod jobs;
pub mod legacy;
pub mod onboarding;
pub mod projects;
pub mod startup;
pub mod student;
pub mod uploads;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                         signup (public)
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (requires auth)
/// /auth/session                        resolved identity (requires auth)
/// /auth/resolve                        post-authentication navigation
///
/// /onboarding                          status (GET), submit (POST)
///
/// /student/profile                     get, update (onboarded student)
/// /student/applications                own applications
/// /student/dashboard                   dashboard
/// /students/{id}                       applicant profile (startup)
///
/// /startup/profile                     get, update (onboarded startup)
/// /startup/jobs                        own jobs, including inactive
/// /startup/applications                applications to own jobs
/// /startup/dashboard                   dashboard
/// /startups                            directory (public)
/// /startups/{id}                       startup with jobs and projects
///
/// /jobs                                list (public), create (startup)
/// /jobs/{id}                           get, update, delete
/// /jobs/{id}/active                    open or close (PATCH)
/// /jobs/{id}/applications              list (owner), apply (student)
///
/// /projects                            list (public), create (startup)
/// /projects/{id}                       delete (owner)
///
/// /blog                                list, create (admin)
/// /blog/featured                       featured post
/// /blog/admin-status                   is the caller an admin?
/// /blog/{slug}                         get
/// /blog/{id}                           update, delete (admin)
/// /blog/{id}/publish                   publish toggle (admin)
/// /blog/{id}/feature                   feature toggle (admin)
///
/// /uploads/{bucket}                    multipart upload
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/onboarding", onboarding::router())
        .nest("/student", student::router())
        .nest("/students", student::directory_router())
        .nest("/startup", startup::router())
        .nest("/startups", startup::directory_router())
        .nest("/jobs", jobs::router())
        .nest("/projects", projects::router())
        .nest("/blog", blog::router())
        .nest("/uploads", uploads::router())
}
