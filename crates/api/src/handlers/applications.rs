//! Handlers for job applications.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use upstart_core::error::CoreError;
use upstart_core::jobs::validate_cover_letter;
use upstart_core::types::DbId;
use upstart_db::models::application::{
    Application, ApplicationWithApplicant, ApplicationWithJob, CreateApplication,
};
use upstart_db::repositories::{ApplicationRepo, JobRepo};

use super::jobs::owned_job;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireStartup, RequireStudent};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/jobs/{id}/applications
///
/// Apply to an active job. A second application to the same job is a 409.
/// Without an explicit `resume_url` the resume on the profile is attached.
pub async fn apply(
    State(state): State<AppState>,
    student: RequireStudent,
    Path(job_id): Path<DbId>,
    Json(input): Json<CreateApplication>,
) -> AppResult<(StatusCode, Json<DataResponse<Application>>)> {
    let job = JobRepo::find_by_id(&state.pool, job_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Job", job_id))?;
    if !job.is_active {
        return Err(AppError::BadRequest(
            "This job is no longer accepting applications".into(),
        ));
    }

    let cover_letter = input
        .cover_letter
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    validate_cover_letter(cover_letter)?;

    let resume_url = input
        .resume_url
        .as_deref()
        .filter(|r| !r.trim().is_empty())
        .or(student.profile.resume_url.as_deref());

    let student_id = student.profile.id;
    let application =
        ApplicationRepo::create(&state.pool, job_id, student_id, cover_letter, resume_url).await?;

    tracing::info!(
        application_id = application.id,
        job_id,
        student_id = %student_id,
        "Application submitted"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: application })))
}

/// GET /api/v1/student/applications
pub async fn list_for_student(
    State(state): State<AppState>,
    student: RequireStudent,
) -> AppResult<Json<DataResponse<Vec<ApplicationWithJob>>>> {
    let apps = ApplicationRepo::list_for_student(&state.pool, student.profile.id).await?;
    Ok(Json(DataResponse { data: apps }))
}

/// GET /api/v1/startup/applications
///
/// Applications to every job the caller owns.
pub async fn list_for_startup(
    State(state): State<AppState>,
    startup: RequireStartup,
) -> AppResult<Json<DataResponse<Vec<ApplicationWithApplicant>>>> {
    let apps = ApplicationRepo::list_for_company(&state.pool, startup.profile.id).await?;
    Ok(Json(DataResponse { data: apps }))
}

/// GET /api/v1/jobs/{id}/applications
pub async fn list_for_job(
    State(state): State<AppState>,
    startup: RequireStartup,
    Path(job_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ApplicationWithApplicant>>>> {
    owned_job(&state, job_id, startup.profile.id).await?;
    let apps = ApplicationRepo::list_for_job(&state.pool, job_id).await?;
    Ok(Json(DataResponse { data: apps }))
}
