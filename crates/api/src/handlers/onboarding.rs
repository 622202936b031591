//! Handlers for `/onboarding`.

use axum::extract::State;
use axum::Json;
use upstart_core::onboarding::OnboardingForm;
use upstart_core::resolver::ONBOARDING_PATH;

use crate::error::AppResult;
use crate::middleware::auth::{AuthUser, OptionalBearer};
use crate::resolver::{Navigation, SessionResolver};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/onboarding
///
/// Whether the caller should see the onboarding form (`continue`) or be sent
/// elsewhere: to login without a session, to their completion destination
/// once onboarded.
pub async fn status(
    State(state): State<AppState>,
    OptionalBearer(token): OptionalBearer,
) -> AppResult<Json<DataResponse<Navigation>>> {
    let navigation = SessionResolver::new(state.identity.as_ref(), state.profiles.as_ref())
        .resolve(token.as_deref(), None, ONBOARDING_PATH)
        .await?;
    Ok(Json(DataResponse { data: navigation }))
}

/// POST /api/v1/onboarding
///
/// Submit the onboarding form for the caller's role. Responds with a
/// redirect to the role's completion destination.
pub async fn submit(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(form): Json<OnboardingForm>,
) -> AppResult<Json<DataResponse<Navigation>>> {
    let location = SessionResolver::new(state.identity.as_ref(), state.profiles.as_ref())
        .submit_onboarding(&auth.access_token, &auth.user, &form)
        .await?;
    Ok(Json(DataResponse {
        data: Navigation::redirect(location),
    }))
}
