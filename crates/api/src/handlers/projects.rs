//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use upstart_core::error::CoreError;
use upstart_core::jobs::required_text;
use upstart_core::types::DbId;
use upstart_db::models::project::{CreateProject, Project};
use upstart_db::repositories::ProjectRepo;

use super::profiles::normalized_skills;
use crate::error::AppResult;
use crate::middleware::rbac::RequireStartup;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    startup: RequireStartup,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let skills = normalized_skills(input.skills.as_ref())?.unwrap_or_else(|| serde_json::json!([]));
    let input = CreateProject {
        title: required_text(&input.title, "title")?,
        description: required_text(&input.description, "description")?,
        skills: None,
    };

    let project = ProjectRepo::create(&state.pool, startup.profile.id, &input, &skills).await?;
    tracing::info!(project_id = project.id, company_id = %project.company_id, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    startup: RequireStartup,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ProjectRepo::delete(&state.pool, id, startup.profile.id).await? {
        return Err(CoreError::not_found("Project", id).into());
    }
    tracing::info!(project_id = id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}
