//! Post-authentication role and onboarding resolution.
//!
//! [`upstart_core::resolver::resolve`] decides what should happen; this
//! module performs the one side effect that decision can require (assigning
//! the role on first visit) and classifies collaborator failures.

use serde::Serialize;
use upstart_core::identity::{IdentityError, IdentityProvider};
use upstart_core::onboarding::{OnboardingForm, OnboardingSubmission};
use upstart_core::resolver::{
    resolve, EntryPoint, FailureOutcome, Resolution, ONBOARDING_PATH, SIGNUP_FAILED_PATH,
};
use upstart_core::roles::Role;
use upstart_core::session::{SessionUser, UserMetadata};
use upstart_db::profile_store::ProfileStore;

use crate::error::{AppError, AppResult};

/// What the client should do next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Navigation {
    /// Render the requested page.
    Continue,
    /// Navigate to `location` instead.
    Redirect { location: String },
}

impl Navigation {
    pub fn redirect(location: impl Into<String>) -> Self {
        Navigation::Redirect {
            location: location.into(),
        }
    }
}

/// Resolution outcomes that are shown in place rather than navigated away from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveFailure {
    #[error("rate limited")]
    RateLimited,
    #[error("role not found")]
    RoleNotFound,
}

impl From<ResolveFailure> for AppError {
    fn from(failure: ResolveFailure) -> Self {
        match failure {
            ResolveFailure::RateLimited => {
                AppError::Identity(IdentityError::RateLimited("resolution throttled".into()))
            }
            ResolveFailure::RoleNotFound => AppError::RoleNotFound,
        }
    }
}

/// Runs resolution against the identity provider and profile store.
pub struct SessionResolver<'a> {
    identity: &'a dyn IdentityProvider,
    profiles: &'a dyn ProfileStore,
}

impl<'a> SessionResolver<'a> {
    pub fn new(identity: &'a dyn IdentityProvider, profiles: &'a dyn ProfileStore) -> Self {
        Self { identity, profiles }
    }

    /// Resolve a request for `path`.
    ///
    /// `access_token` is the caller's bearer token, if any; an invalid or
    /// expired token counts as no session. `url_role` is the role requested
    /// on the callback URL and is only read when the session has no role.
    pub async fn resolve(
        &self,
        access_token: Option<&str>,
        url_role: Option<&str>,
        path: &str,
    ) -> Result<Navigation, ResolveFailure> {
        let entry = EntryPoint::from_path(path);

        let session = match access_token {
            None => None,
            Some(token) => match self.identity.get_user(token).await {
                Ok(user) => Some((token, user)),
                Err(IdentityError::Unauthorized(_) | IdentityError::InvalidCredentials) => None,
                Err(e) => return Self::identity_failure(&e),
            },
        };

        match resolve(session.as_ref().map(|(_, user)| user), url_role, &entry) {
            Resolution::Continue => Ok(Navigation::Continue),
            Resolution::Redirect(location) => Ok(Navigation::redirect(location)),
            Resolution::RoleNotFound => {
                tracing::warn!(path, "Session has no role and none was supplied");
                Err(ResolveFailure::RoleNotFound)
            }
            Resolution::AssignRole(role) => match session {
                Some((token, user)) => self.assign_role(token, &user, role).await,
                None => Ok(Navigation::redirect(upstart_core::resolver::LOGIN_PATH)),
            },
        }
    }

    /// First visit after signup: write the role unless one is already set,
    /// confirm it by re-reading the session, create the empty profile row,
    /// then go to onboarding.
    ///
    /// Only the request whose write landed creates the profile, and only for
    /// the confirmed role. A request that lost the race goes straight to
    /// onboarding.
    async fn assign_role(
        &self,
        access_token: &str,
        user: &SessionUser,
        requested: Role,
    ) -> Result<Navigation, ResolveFailure> {
        let written = match self
            .identity
            .assign_role_if_unset(access_token, requested)
            .await
        {
            Ok(written) => written.is_some(),
            Err(e) => return Self::identity_failure(&e),
        };

        let confirmed = match self.identity.get_user(access_token).await {
            Ok(confirmed) => confirmed,
            Err(e) => return Self::identity_failure(&e),
        };
        let Some(role) = confirmed.role else {
            tracing::warn!(user_id = %user.id, "Role write was not visible on re-read");
            return Ok(Self::generic_failure());
        };

        if !written {
            tracing::info!(user_id = %user.id, %requested, %role, "Role already assigned");
            return Ok(Navigation::redirect(ONBOARDING_PATH));
        }
        if role != requested {
            tracing::info!(user_id = %user.id, %requested, %role, "Confirmed role differs from requested role");
        }

        if let Err(e) = self.profiles.ensure_profile(user.id, role).await {
            tracing::error!(user_id = %user.id, %role, error = %e, "Profile creation failed");
            return Ok(Self::generic_failure());
        }

        tracing::info!(user_id = %user.id, %role, "Role assigned");
        Ok(Navigation::redirect(ONBOARDING_PATH))
    }

    /// Persist the onboarding form and mark onboarding complete.
    ///
    /// Profile fields are written before the status flips, so a failure in
    /// between leaves the user able to resubmit. Returns the completion
    /// destination for the user's role.
    pub async fn submit_onboarding(
        &self,
        access_token: &str,
        user: &SessionUser,
        form: &OnboardingForm,
    ) -> AppResult<String> {
        let submission = OnboardingSubmission::for_user(user, form)?;
        let role = submission.role();

        self.profiles
            .complete_onboarding(user.id, &submission)
            .await?;
        self.identity
            .update_user_metadata(access_token, UserMetadata::completed())
            .await?;

        tracing::info!(user_id = %user.id, %role, "Onboarding completed");
        Ok(role.completion_path())
    }

    fn identity_failure(err: &IdentityError) -> Result<Navigation, ResolveFailure> {
        match FailureOutcome::for_identity(err) {
            FailureOutcome::RateLimited => {
                tracing::warn!(error = %err, "Identity provider rate limited resolution");
                Err(ResolveFailure::RateLimited)
            }
            FailureOutcome::Redirect(location) => {
                tracing::warn!(error = %err, "Resolution failed");
                Ok(Navigation::redirect(location))
            }
        }
    }

    fn generic_failure() -> Navigation {
        Navigation::redirect(SIGNUP_FAILED_PATH)
    }
}
