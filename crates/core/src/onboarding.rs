//! Onboarding form submission.
//!
//! Students provide their name, startups their company name. The submission
//! is built from the role already on the session, never from the request.

use serde::Deserialize;

use crate::error::CoreError;
use crate::roles::{OnboardingStatus, Role};
use crate::session::SessionUser;

/// Longest accepted value for any onboarding name field.
pub const MAX_NAME_LEN: usize = 100;

/// Raw onboarding form as posted by the client.
#[derive(Debug, Default, Deserialize)]
pub struct OnboardingForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
}

/// Validated onboarding payload for one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnboardingSubmission {
    Student {
        first_name: String,
        last_name: String,
    },
    Startup {
        company_name: String,
    },
}

impl OnboardingSubmission {
    pub fn role(&self) -> Role {
        match self {
            OnboardingSubmission::Student { .. } => Role::Student,
            OnboardingSubmission::Startup { .. } => Role::Startup,
        }
    }

    /// Validate `form` for `user`.
    ///
    /// Fails if the user has no role, has already completed onboarding, or
    /// left a required field blank.
    pub fn for_user(user: &SessionUser, form: &OnboardingForm) -> Result<Self, CoreError> {
        let role = user.role.ok_or_else(|| {
            CoreError::Forbidden("A role must be assigned before onboarding".into())
        })?;

        if user.effective_status() == Some(OnboardingStatus::Complete) {
            return Err(CoreError::Conflict("Onboarding already completed".into()));
        }

        match role {
            Role::Student => Ok(OnboardingSubmission::Student {
                first_name: required(form.first_name.as_deref(), "first_name")?,
                last_name: required(form.last_name.as_deref(), "last_name")?,
            }),
            Role::Startup => Ok(OnboardingSubmission::Startup {
                company_name: required(form.company_name.as_deref(), "company_name")?,
            }),
        }
    }
}

fn required(value: Option<&str>, field: &str) -> Result<String, CoreError> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(value.to_string())
}
