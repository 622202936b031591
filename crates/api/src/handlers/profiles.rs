//! Handlers for the caller's own profile and for viewing student profiles.

use axum::extract::{Path, State};
use axum::Json;
use upstart_core::error::CoreError;
use upstart_core::skills::parse_skills;
use upstart_core::types::UserId;
use upstart_db::models::company::{Company, UpdateCompany};
use upstart_db::models::student::{Student, UpdateStudent};
use upstart_db::repositories::{CompanyRepo, StudentRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireStartup, RequireStudent};
use crate::response::DataResponse;
use crate::state::AppState;

const MIN_GRADUATION_YEAR: i32 = 1950;
const MAX_GRADUATION_YEAR: i32 = 2100;

/// GET /api/v1/student/profile
pub async fn get_student_profile(student: RequireStudent) -> Json<DataResponse<Student>> {
    Json(DataResponse {
        data: student.profile,
    })
}

/// PUT /api/v1/student/profile
///
/// Partial update. `skills` may be an array, a JSON-encoded array string or
/// comma-separated text.
pub async fn update_student_profile(
    State(state): State<AppState>,
    student: RequireStudent,
    Json(input): Json<UpdateStudent>,
) -> AppResult<Json<DataResponse<Student>>> {
    if let Some(year) = input.graduation_year {
        if !(MIN_GRADUATION_YEAR..=MAX_GRADUATION_YEAR).contains(&year) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "graduation_year must be between {MIN_GRADUATION_YEAR} and {MAX_GRADUATION_YEAR}"
            ))));
        }
    }
    let input = UpdateStudent {
        first_name: non_blank(input.first_name, "first_name")?,
        last_name: non_blank(input.last_name, "last_name")?,
        skills: normalized_skills(input.skills.as_ref())?,
        ..input
    };

    let updated = StudentRepo::update(&state.pool, student.profile.id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Student", student.profile.id))?;

    tracing::info!(user_id = %updated.id, "Student profile updated");
    Ok(Json(DataResponse { data: updated }))
}

/// GET /api/v1/startup/profile
pub async fn get_startup_profile(startup: RequireStartup) -> Json<DataResponse<Company>> {
    Json(DataResponse {
        data: startup.profile,
    })
}

/// PUT /api/v1/startup/profile
pub async fn update_startup_profile(
    State(state): State<AppState>,
    startup: RequireStartup,
    Json(input): Json<UpdateCompany>,
) -> AppResult<Json<DataResponse<Company>>> {
    let input = UpdateCompany {
        company_name: non_blank(input.company_name, "company_name")?,
        ..input
    };

    let updated = CompanyRepo::update(&state.pool, startup.profile.id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Company", startup.profile.id))?;

    tracing::info!(user_id = %updated.id, "Startup profile updated");
    Ok(Json(DataResponse { data: updated }))
}

/// GET /api/v1/students/{id}
///
/// Startups viewing an applicant.
pub async fn get_student(
    State(state): State<AppState>,
    _startup: RequireStartup,
    Path(id): Path<UserId>,
) -> AppResult<Json<DataResponse<Student>>> {
    let student = StudentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Student", id))?;
    Ok(Json(DataResponse { data: student }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Trim an optional field; a present-but-blank value is rejected.
pub(crate) fn non_blank(value: Option<String>, field: &str) -> Result<Option<String>, AppError> {
    match value {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Err(AppError::Core(CoreError::Validation(format!(
            "{field} must not be blank"
        )))),
        Some(v) => Ok(Some(v.trim().to_string())),
    }
}

/// Normalize an optional skills value into a JSON array.
pub(crate) fn normalized_skills(
    value: Option<&serde_json::Value>,
) -> Result<Option<serde_json::Value>, AppError> {
    value
        .map(|v| parse_skills(v).map(|skills| serde_json::json!(skills)))
        .transpose()
        .map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_blank_trims_and_rejects_blank() {
        assert_eq!(non_blank(None, "x").unwrap(), None);
        assert_eq!(non_blank(Some(" Ada ".into()), "x").unwrap(), Some("Ada".into()));
        assert!(non_blank(Some("  ".into()), "x").is_err());
    }

    #[test]
    fn skills_are_normalized_to_arrays() {
        assert_eq!(normalized_skills(None).unwrap(), None);
        assert_eq!(
            normalized_skills(Some(&json!("rust, go, Rust"))).unwrap(),
            Some(json!(["rust", "go"]))
        );
        assert!(normalized_skills(Some(&json!(42))).is_err());
    }
}
