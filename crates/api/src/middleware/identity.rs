//! Resolves the caller into a role-specific identity once per request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::Serialize;
use upstart_core::session::SessionUser;
use upstart_db::models::company::Company;
use upstart_db::models::student::Student;
use upstart_db::profile_store::Profile;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Who the caller is, with the profile row matching their role.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UserIdentity {
    Student { user: SessionUser, profile: Student },
    Startup { user: SessionUser, profile: Company },
    RoleUnset { user: SessionUser },
}

impl UserIdentity {
    pub fn user(&self) -> &SessionUser {
        match self {
            UserIdentity::Student { user, .. }
            | UserIdentity::Startup { user, .. }
            | UserIdentity::RoleUnset { user } => user,
        }
    }

    fn from_profile(user: SessionUser, profile: Profile) -> Self {
        match profile {
            Profile::Student(profile) => UserIdentity::Student { user, profile },
            Profile::Company(profile) => UserIdentity::Startup { user, profile },
        }
    }
}

/// [`UserIdentity`] for the authenticated caller.
///
/// A user with a role always has a profile row; a missing one is created
/// here.
pub struct CurrentIdentity {
    pub access_token: String,
    pub identity: UserIdentity,
}

impl FromRequestParts<AppState> for CurrentIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser { access_token, user } = AuthUser::from_request_parts(parts, state).await?;

        let identity = match user.role {
            None => UserIdentity::RoleUnset { user },
            Some(role) => {
                let profile = state.profiles.ensure_profile(user.id, role).await?;
                UserIdentity::from_profile(user, profile)
            }
        };

        Ok(CurrentIdentity {
            access_token,
            identity,
        })
    }
}
