pub mod applications;
pub mod auth;
pub mod blog;
pub mod dashboard;
pub mod jobs;
pub mod legacy;
pub mod onboarding;
pub mod profiles;
pub mod projects;
pub mod startups;
pub mod uploads;

use upstart_core::error::CoreError;
use validator::Validate;

use crate::error::AppError;

/// Run `validator` rules on a request body, mapping failures to a 400.
pub(crate) fn validate_body<T: Validate>(input: &T) -> Result<(), AppError> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))
}
