//! Skills list normalisation.
//!
//! Skills arrive in several shapes: a JSON array, a JSON array that was
//! stringified by a form, or plain comma-separated text. All of them are
//! normalised to a trimmed list with case-insensitive duplicates removed
//! (first spelling wins).

use serde_json::Value;

use crate::error::CoreError;

/// Maximum number of skills kept on a profile, job or project.
pub const MAX_SKILLS: usize = 50;
/// Maximum length of a single skill.
pub const MAX_SKILL_LEN: usize = 50;

/// Normalise a skills value of any accepted JSON shape.
pub fn parse_skills(value: &Value) -> Result<Vec<String>, CoreError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => {
            let mut raw = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => raw.push(s.as_str()),
                    other => {
                        return Err(CoreError::Validation(format!(
                            "Skills must be strings, got {other}"
                        )))
                    }
                }
            }
            normalize(raw)
        }
        Value::String(s) => parse_skills_text(s),
        other => Err(CoreError::Validation(format!(
            "Skills must be an array or a string, got {other}"
        ))),
    }
}

/// Normalise skills given as text: either a JSON-encoded array or a
/// comma-separated list.
pub fn parse_skills_text(text: &str) -> Result<Vec<String>, CoreError> {
    let trimmed = text.trim();
    if trimmed.starts_with('[') {
        let parsed: Value = serde_json::from_str(trimmed)
            .map_err(|e| CoreError::Validation(format!("Invalid skills JSON: {e}")))?;
        return parse_skills(&parsed);
    }
    normalize(trimmed.split(','))
}

fn normalize<'a>(raw: impl IntoIterator<Item = &'a str>) -> Result<Vec<String>, CoreError> {
    let mut out: Vec<String> = Vec::new();
    for skill in raw.into_iter().map(str::trim).filter(|s| !s.is_empty()) {
        if skill.chars().count() > MAX_SKILL_LEN {
            return Err(CoreError::Validation(format!(
                "Skill '{skill}' exceeds {MAX_SKILL_LEN} characters"
            )));
        }
        if !out.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
            out.push(skill.to_string());
        }
    }
    if out.len() > MAX_SKILLS {
        return Err(CoreError::Validation(format!(
            "At most {MAX_SKILLS} skills are allowed"
        )));
    }
    Ok(out)
}
