//! Public startup directory.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use upstart_core::error::CoreError;
use upstart_core::types::UserId;
use upstart_db::models::company::Company;
use upstart_db::models::job::Job;
use upstart_db::models::project::Project;
use upstart_db::repositories::{CompanyRepo, JobRepo, ProjectRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// A startup with its open jobs and projects.
#[derive(Debug, Serialize)]
pub struct StartupDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<Job>,
    pub projects: Vec<Project>,
}

/// GET /api/v1/startups
///
/// Startups that have completed onboarding, by name.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Company>>>> {
    let companies = CompanyRepo::list_named(&state.pool).await?;
    Ok(Json(DataResponse { data: companies }))
}

/// GET /api/v1/startups/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> AppResult<Json<DataResponse<StartupDetail>>> {
    let company = CompanyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Startup", id))?;

    let jobs = JobRepo::list_by_company(&state.pool, id)
        .await?
        .into_iter()
        .filter(|job| job.is_active)
        .collect();
    let projects = ProjectRepo::list_by_company(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: StartupDetail {
            company,
            jobs,
            projects,
        },
    }))
}
