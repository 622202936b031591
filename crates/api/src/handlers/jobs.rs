//! Handlers for the `/jobs` resource.
//!
//! Listings are public; writes are restricted to the owning startup. A job
//! that belongs to another company is reported as not found.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use upstart_core::error::CoreError;
use upstart_core::jobs::{required_text, validate_job_type, validate_salary_range};
use upstart_core::types::{DbId, UserId};
use upstart_db::models::job::{CreateJob, Job, JobListing, UpdateJob};
use upstart_db::repositories::JobRepo;

use super::profiles::{non_blank, normalized_skills};
use crate::error::AppResult;
use crate::middleware::rbac::RequireStartup;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PATCH /jobs/{id}/active`.
#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// GET /api/v1/jobs
///
/// Active jobs, newest first, with company name and logo.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<JobListing>>>> {
    let jobs = JobRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// GET /api/v1/jobs/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<JobListing>>> {
    let job = JobRepo::find_listing(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Job", id))?;
    Ok(Json(DataResponse { data: job }))
}

/// POST /api/v1/jobs
pub async fn create(
    State(state): State<AppState>,
    startup: RequireStartup,
    Json(input): Json<CreateJob>,
) -> AppResult<(StatusCode, Json<DataResponse<Job>>)> {
    let job_type = input.job_type.trim().to_string();
    validate_job_type(&job_type)?;
    validate_salary_range(input.salary_min, input.salary_max)?;

    let skills = normalized_skills(input.skills.as_ref())?.unwrap_or_else(|| serde_json::json!([]));
    let input = CreateJob {
        title: required_text(&input.title, "title")?,
        description: required_text(&input.description, "description")?,
        job_type,
        location: input.location.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()),
        ..input
    };

    let company_id = startup.profile.id;
    let job = JobRepo::create(&state.pool, company_id, &input, &skills).await?;
    tracing::info!(job_id = job.id, company_id = %company_id, "Job created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: job })))
}

/// PUT /api/v1/jobs/{id}
///
/// Partial update. The salary range is checked against the stored values
/// for whichever bound is omitted.
pub async fn update(
    State(state): State<AppState>,
    startup: RequireStartup,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateJob>,
) -> AppResult<Json<DataResponse<Job>>> {
    let company_id = startup.profile.id;
    let existing = owned_job(&state, id, company_id).await?;

    if let Some(job_type) = &input.job_type {
        validate_job_type(job_type.trim())?;
    }
    validate_salary_range(
        input.salary_min.or(existing.salary_min),
        input.salary_max.or(existing.salary_max),
    )?;

    let input = UpdateJob {
        title: non_blank(input.title, "title")?,
        description: non_blank(input.description, "description")?,
        job_type: input.job_type.map(|t| t.trim().to_string()),
        skills: normalized_skills(input.skills.as_ref())?,
        ..input
    };

    let job = JobRepo::update(&state.pool, id, company_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Job", id))?;
    tracing::info!(job_id = id, company_id = %company_id, "Job updated");
    Ok(Json(DataResponse { data: job }))
}

/// PATCH /api/v1/jobs/{id}/active
pub async fn set_active(
    State(state): State<AppState>,
    startup: RequireStartup,
    Path(id): Path<DbId>,
    Json(input): Json<SetActiveRequest>,
) -> AppResult<Json<DataResponse<Job>>> {
    let company_id = startup.profile.id;
    let job = JobRepo::set_active(&state.pool, id, company_id, input.is_active)
        .await?
        .ok_or_else(|| CoreError::not_found("Job", id))?;
    tracing::info!(job_id = id, is_active = input.is_active, "Job visibility changed");
    Ok(Json(DataResponse { data: job }))
}

/// DELETE /api/v1/jobs/{id}
pub async fn delete(
    State(state): State<AppState>,
    startup: RequireStartup,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let company_id = startup.profile.id;
    if !JobRepo::delete(&state.pool, id, company_id).await? {
        return Err(CoreError::not_found("Job", id).into());
    }
    tracing::info!(job_id = id, company_id = %company_id, "Job deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/startup/jobs
///
/// The caller's own jobs, including inactive ones.
pub async fn list_own(
    State(state): State<AppState>,
    startup: RequireStartup,
) -> AppResult<Json<DataResponse<Vec<Job>>>> {
    let jobs = JobRepo::list_by_company(&state.pool, startup.profile.id).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// Load a job and check that `company_id` owns it.
pub(crate) async fn owned_job(
    state: &AppState,
    id: DbId,
    company_id: UserId,
) -> AppResult<Job> {
    match JobRepo::find_by_id(&state.pool, id).await? {
        Some(job) if job.company_id == company_id => Ok(job),
        _ => Err(CoreError::not_found("Job", id).into()),
    }
}
