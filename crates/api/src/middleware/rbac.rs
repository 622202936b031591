//! Role gates.
//!
//! The student and startup extractors run the resolver for the role's own
//! area, so a user who has not finished onboarding, or who belongs to the
//! other role, is told where to go instead of being served.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use upstart_core::error::CoreError;
use upstart_core::resolver::{resolve, EntryPoint, Resolution};
use upstart_core::roles::Role;
use upstart_core::session::SessionUser;
use upstart_db::models::company::Company;
use upstart_db::models::student::Student;
use upstart_db::profile_store::Profile;
use upstart_db::repositories::AdminRepo;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Check that `user` may use the area of `role`.
pub fn gate(user: &SessionUser, role: Role) -> Result<(), AppError> {
    match resolve(Some(user), None, &EntryPoint::Protected(role.area_prefix())) {
        Resolution::Continue => Ok(()),
        Resolution::Redirect(location) => Err(AppError::Redirect(location)),
        Resolution::RoleNotFound | Resolution::AssignRole(_) => Err(AppError::RoleNotFound),
    }
}

async fn gated_profile(
    parts: &mut Parts,
    state: &AppState,
    role: Role,
) -> Result<(AuthUser, Profile), AppError> {
    let auth = AuthUser::from_request_parts(parts, state).await?;
    gate(&auth.user, role)?;
    let profile = state.profiles.ensure_profile(auth.user.id, role).await?;
    Ok((auth, profile))
}

/// An onboarded student and their profile row.
///
/// ```ignore
/// async fn handler(student: RequireStudent) -> AppResult<Json<Student>> {
///     Ok(Json(student.profile))
/// }
/// ```
pub struct RequireStudent {
    pub auth: AuthUser,
    pub profile: Student,
}

impl FromRequestParts<AppState> for RequireStudent {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match gated_profile(parts, state, Role::Student).await? {
            (auth, Profile::Student(profile)) => Ok(RequireStudent { auth, profile }),
            _ => Err(AppError::InternalError("Profile store returned wrong role".into())),
        }
    }
}

/// An onboarded startup and its company row.
pub struct RequireStartup {
    pub auth: AuthUser,
    pub profile: Company,
}

impl FromRequestParts<AppState> for RequireStartup {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match gated_profile(parts, state, Role::Startup).await? {
            (auth, Profile::Company(profile)) => Ok(RequireStartup { auth, profile }),
            _ => Err(AppError::InternalError("Profile store returned wrong role".into())),
        }
    }
}

/// Requires membership of the `admins` allow-list. Rejects with 403 otherwise.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !AdminRepo::is_admin(&state.pool, user.user.id).await? {
            tracing::warn!(user_id = %user.user.id, "Non-admin attempted an admin action");
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin access required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use upstart_core::roles::OnboardingStatus;
    use uuid::Uuid;

    fn user(role: Option<Role>, status: Option<OnboardingStatus>) -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            email: "x@example.com".into(),
            role,
            onboarding_status: status,
        }
    }

    #[test]
    fn onboarded_user_passes_own_gate() {
        let u = user(Some(Role::Student), Some(OnboardingStatus::Complete));
        assert!(gate(&u, Role::Student).is_ok());
    }

    #[test]
    fn other_role_is_sent_to_own_dashboard() {
        let u = user(Some(Role::Student), Some(OnboardingStatus::Complete));
        assert_matches!(
            gate(&u, Role::Startup),
            Err(AppError::Redirect(location)) if location == "/student/dashboard"
        );
    }

    #[test]
    fn unfinished_onboarding_is_sent_to_onboarding() {
        let u = user(Some(Role::Startup), None);
        assert_matches!(
            gate(&u, Role::Startup),
            Err(AppError::Redirect(location)) if location == "/onboarding"
        );
    }

    #[test]
    fn roleless_user_is_terminal() {
        assert_matches!(gate(&user(None, None), Role::Student), Err(AppError::RoleNotFound));
    }
}
