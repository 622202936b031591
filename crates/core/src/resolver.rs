//! Post-authentication role/onboarding resolution.
//!
//! [`resolve`] is a pure decision table over the current session, the
//! optional `role` query parameter and the requested path. It names exactly
//! one outcome; performing the outcome's side effect (metadata write,
//! profile creation, redirect) is the caller's job.

use crate::identity::IdentityError;
use crate::roles::{OnboardingStatus, Role};
use crate::session::SessionUser;

pub const LOGIN_PATH: &str = "/login";
pub const ONBOARDING_PATH: &str = "/onboarding";
pub const CALLBACK_PATH: &str = "/auth/callback";
/// Generic failure landing page for the signup/callback flow.
pub const SIGNUP_FAILED_PATH: &str = "/login?error=OAuth_Signup_Failed";
pub const ROLE_NOT_FOUND_MESSAGE: &str = "Role not found";

/// Which kind of page the resolution is being performed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPoint {
    /// Landing straight after the identity provider redirect.
    Callback,
    /// The login page itself.
    Login,
    /// The onboarding form.
    Onboarding,
    /// Any other page that needs a session.
    Protected(String),
}

impl EntryPoint {
    /// Classify a requested path. Query strings and trailing slashes are ignored.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" | CALLBACK_PATH => EntryPoint::Callback,
            LOGIN_PATH => EntryPoint::Login,
            ONBOARDING_PATH => EntryPoint::Onboarding,
            other => EntryPoint::Protected(other.to_string()),
        }
    }
}

/// The single action the resolver decided on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Render the requested page in place.
    Continue,
    /// Send the user elsewhere.
    Redirect(String),
    /// First visit after signup: persist this role, create the empty
    /// profile, then send the user to onboarding.
    AssignRole(Role),
    /// Session has no role and none was supplied. Terminal, no redirect.
    RoleNotFound,
}

impl Resolution {
    fn redirect(path: impl Into<String>) -> Self {
        Resolution::Redirect(path.into())
    }
}

/// Decide what to do for `session` arriving at `entry`.
///
/// `url_role` is only consulted when the session has no role yet; an empty or
/// unrecognised value counts as absent.
pub fn resolve(session: Option<&SessionUser>, url_role: Option<&str>, entry: &EntryPoint) -> Resolution {
    let Some(user) = session else {
        return match entry {
            EntryPoint::Login => Resolution::Continue,
            _ => Resolution::redirect(LOGIN_PATH),
        };
    };

    let Some(role) = user.role else {
        return match url_role.and_then(|r| r.parse::<Role>().ok()) {
            Some(requested) => Resolution::AssignRole(requested),
            None => Resolution::RoleNotFound,
        };
    };

    match user.effective_status() {
        Some(OnboardingStatus::Complete) => match entry {
            EntryPoint::Callback | EntryPoint::Login => Resolution::redirect(role.dashboard_path()),
            EntryPoint::Onboarding => Resolution::redirect(role.completion_path()),
            EntryPoint::Protected(path) => match Role::for_path(path) {
                Some(owner) if owner != role => Resolution::redirect(role.dashboard_path()),
                _ => Resolution::Continue,
            },
        },
        _ => match entry {
            EntryPoint::Onboarding => Resolution::Continue,
            _ => Resolution::redirect(ONBOARDING_PATH),
        },
    }
}

/// How a failed resolution is surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureOutcome {
    /// Show the rate-limit message in place; do not redirect.
    RateLimited,
    /// Redirect to the generic failure page.
    Redirect(String),
}

impl FailureOutcome {
    pub fn for_identity(err: &IdentityError) -> Self {
        if err.is_rate_limited() {
            FailureOutcome::RateLimited
        } else {
            FailureOutcome::Redirect(SIGNUP_FAILED_PATH.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(role: Option<Role>, status: Option<OnboardingStatus>) -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            email: "someone@example.com".into(),
            role,
            onboarding_status: status,
        }
    }

    fn protected(path: &str) -> EntryPoint {
        EntryPoint::Protected(path.into())
    }

    #[test]
    fn entry_point_from_path() {
        assert_eq!(EntryPoint::from_path("/auth/callback?code=x"), EntryPoint::Callback);
        assert_eq!(EntryPoint::from_path("/login/"), EntryPoint::Login);
        assert_eq!(EntryPoint::from_path("/onboarding"), EntryPoint::Onboarding);
        assert_eq!(
            EntryPoint::from_path("/student/dashboard"),
            protected("/student/dashboard")
        );
    }

    #[test]
    fn no_session_redirects_to_login() {
        for entry in [EntryPoint::Callback, EntryPoint::Onboarding, protected("/student/dashboard")] {
            assert_eq!(resolve(None, Some("student"), &entry), Resolution::Redirect("/login".into()));
        }
        assert_eq!(resolve(None, None, &EntryPoint::Login), Resolution::Continue);
    }

    #[test]
    fn missing_role_without_param_is_terminal() {
        let u = user(None, None);
        for entry in [
            EntryPoint::Callback,
            EntryPoint::Login,
            EntryPoint::Onboarding,
            protected("/startup/dashboard"),
        ] {
            assert_eq!(resolve(Some(&u), None, &entry), Resolution::RoleNotFound);
            assert_eq!(resolve(Some(&u), Some(""), &entry), Resolution::RoleNotFound);
            assert_eq!(resolve(Some(&u), Some("admin"), &entry), Resolution::RoleNotFound);
        }
    }

    #[test]
    fn missing_role_with_param_assigns() {
        let u = user(None, None);
        assert_eq!(
            resolve(Some(&u), Some("student"), &EntryPoint::Callback),
            Resolution::AssignRole(Role::Student)
        );
        assert_eq!(
            resolve(Some(&u), Some("startup"), &EntryPoint::Callback),
            Resolution::AssignRole(Role::Startup)
        );
    }

    #[test]
    fn url_role_is_ignored_once_role_is_set() {
        let u = user(Some(Role::Student), Some(OnboardingStatus::NotStarted));
        assert_eq!(
            resolve(Some(&u), Some("startup"), &EntryPoint::Callback),
            Resolution::Redirect("/onboarding".into())
        );
    }

    #[test]
    fn not_started_sends_every_protected_page_to_onboarding() {
        for role in [Role::Student, Role::Startup] {
            let u = user(Some(role), Some(OnboardingStatus::NotStarted));
            for path in [
                "/student/dashboard",
                "/startup/dashboard",
                "/student/profile",
                "/startup/jobs/new",
                "/blog/new",
            ] {
                assert_eq!(
                    resolve(Some(&u), None, &protected(path)),
                    Resolution::Redirect("/onboarding".into()),
                    "{role} at {path}"
                );
            }
            assert_eq!(resolve(Some(&u), None, &EntryPoint::Onboarding), Resolution::Continue);
        }
    }

    #[test]
    fn role_without_status_counts_as_not_started() {
        let u = user(Some(Role::Startup), None);
        assert_eq!(
            resolve(Some(&u), None, &EntryPoint::Login),
            Resolution::Redirect("/onboarding".into())
        );
    }

    #[test]
    fn complete_users_skip_onboarding() {
        let student = user(Some(Role::Student), Some(OnboardingStatus::Complete));
        let startup = user(Some(Role::Startup), Some(OnboardingStatus::Complete));

        assert_eq!(
            resolve(Some(&startup), None, &EntryPoint::Login),
            Resolution::Redirect("/startup/dashboard".into())
        );
        assert_eq!(
            resolve(Some(&student), None, &EntryPoint::Callback),
            Resolution::Redirect("/student/dashboard".into())
        );
        assert_eq!(
            resolve(Some(&student), None, &EntryPoint::Onboarding),
            Resolution::Redirect("/student/profile".into())
        );
        assert_eq!(
            resolve(Some(&startup), None, &EntryPoint::Onboarding),
            Resolution::Redirect("/startup/dashboard".into())
        );
    }

    #[test]
    fn complete_users_stay_in_their_own_area() {
        let student = user(Some(Role::Student), Some(OnboardingStatus::Complete));
        assert_eq!(
            resolve(Some(&student), None, &protected("/student/dashboard")),
            Resolution::Continue
        );
        assert_eq!(resolve(Some(&student), None, &protected("/blog")), Resolution::Continue);
        assert_eq!(
            resolve(Some(&student), None, &protected("/startup/dashboard")),
            Resolution::Redirect("/student/dashboard".into())
        );
    }

    #[test]
    fn failure_outcomes() {
        let throttled = IdentityError::from_provider(None, "HTTP 429 Too Many Requests");
        assert_eq!(FailureOutcome::for_identity(&throttled), FailureOutcome::RateLimited);

        let other = IdentityError::from_provider(Some(502), "bad gateway");
        assert_eq!(
            FailureOutcome::for_identity(&other),
            FailureOutcome::Redirect("/login?error=OAuth_Signup_Failed".into())
        );
    }
}
