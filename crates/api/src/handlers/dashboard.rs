//! Role dashboards.
//!
//! Both are behind the role gates, so a user who has not finished
//! onboarding receives a redirect instruction instead of data.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use upstart_db::models::application::{ApplicationWithApplicant, ApplicationWithJob};
use upstart_db::models::company::Company;
use upstart_db::models::student::Student;
use upstart_db::repositories::{ApplicationRepo, JobRepo};

use crate::error::AppResult;
use crate::middleware::rbac::{RequireStartup, RequireStudent};
use crate::response::DataResponse;
use crate::state::AppState;

/// Number of recent applications shown on a dashboard.
const RECENT_APPLICATIONS: usize = 5;

#[derive(Debug, Serialize)]
pub struct StudentDashboard {
    pub profile: Student,
    pub application_count: i64,
    pub open_job_count: i64,
    pub recent_applications: Vec<ApplicationWithJob>,
}

#[derive(Debug, Serialize)]
pub struct StartupDashboard {
    pub profile: Company,
    pub job_count: usize,
    pub active_job_count: usize,
    pub application_count: i64,
    pub recent_applications: Vec<ApplicationWithApplicant>,
}

/// GET /api/v1/student/dashboard
pub async fn student(
    State(state): State<AppState>,
    student: RequireStudent,
) -> AppResult<Json<DataResponse<StudentDashboard>>> {
    let id = student.profile.id;
    let application_count = ApplicationRepo::count_for_student(&state.pool, id).await?;
    let open_job_count = JobRepo::count_active(&state.pool).await?;
    let mut recent_applications = ApplicationRepo::list_for_student(&state.pool, id).await?;
    recent_applications.truncate(RECENT_APPLICATIONS);

    tracing::debug!(user_id = %id, "Student dashboard loaded");
    Ok(Json(DataResponse {
        data: StudentDashboard {
            profile: student.profile,
            application_count,
            open_job_count,
            recent_applications,
        },
    }))
}

/// GET /api/v1/startup/dashboard
pub async fn startup(
    State(state): State<AppState>,
    startup: RequireStartup,
) -> AppResult<Json<DataResponse<StartupDashboard>>> {
    let id = startup.profile.id;
    let jobs = JobRepo::list_by_company(&state.pool, id).await?;
    let application_count = ApplicationRepo::count_for_company(&state.pool, id).await?;
    let mut recent_applications = ApplicationRepo::list_for_company(&state.pool, id).await?;
    recent_applications.truncate(RECENT_APPLICATIONS);

    tracing::debug!(user_id = %id, "Startup dashboard loaded");
    Ok(Json(DataResponse {
        data: StartupDashboard {
            profile: startup.profile,
            job_count: jobs.len(),
            active_job_count: jobs.iter().filter(|j| j.is_active).count(),
            application_count,
            recent_applications,
        },
    }))
}
