//! Job posting constants and validation.

use crate::error::CoreError;

pub const JOB_TYPE_FULL_TIME: &str = "full_time";
pub const JOB_TYPE_PART_TIME: &str = "part_time";
pub const JOB_TYPE_INTERNSHIP: &str = "internship";
pub const JOB_TYPE_CONTRACT: &str = "contract";

/// All valid job types.
pub const VALID_JOB_TYPES: &[&str] = &[
    JOB_TYPE_FULL_TIME,
    JOB_TYPE_PART_TIME,
    JOB_TYPE_INTERNSHIP,
    JOB_TYPE_CONTRACT,
];

/// Maximum length of a cover letter.
pub const MAX_COVER_LETTER_LEN: usize = 5000;

pub fn validate_job_type(job_type: &str) -> Result<(), CoreError> {
    if VALID_JOB_TYPES.contains(&job_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid job_type '{job_type}'. Must be one of: {VALID_JOB_TYPES:?}"
        )))
    }
}

/// Salaries are optional, non-negative, and the minimum may not exceed the maximum.
pub fn validate_salary_range(min: Option<i32>, max: Option<i32>) -> Result<(), CoreError> {
    if min.is_some_and(|v| v < 0) || max.is_some_and(|v| v < 0) {
        return Err(CoreError::Validation("Salary must not be negative".into()));
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(CoreError::Validation(format!(
                "salary_min ({min}) must not exceed salary_max ({max})"
            )));
        }
    }
    Ok(())
}

/// Validate a non-empty required text field, returning it trimmed.
pub fn required_text(value: &str, field: &str) -> Result<String, CoreError> {
    let value = value.trim();
    if value.is_empty() {
        Err(CoreError::Validation(format!("{field} is required")))
    } else {
        Ok(value.to_string())
    }
}

pub fn validate_cover_letter(letter: Option<&str>) -> Result<(), CoreError> {
    match letter {
        Some(text) if text.chars().count() > MAX_COVER_LETTER_LEN => Err(CoreError::Validation(
            format!("cover_letter must be at most {MAX_COVER_LETTER_LEN} characters"),
        )),
        _ => Ok(()),
    }
}
