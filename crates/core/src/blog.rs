//! Blog post helpers: slug derivation, excerpts and input validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Length of generated excerpts, in characters.
pub const EXCERPT_LEN: usize = 200;
/// Maximum title length.
pub const MAX_TITLE_LEN: usize = 200;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

static VALID_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"));

/// Turn a title into a URL slug: lowercase ASCII alphanumerics separated by
/// single hyphens.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    NON_SLUG_CHARS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Validate a client-supplied slug.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if VALID_SLUG.is_match(slug) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Use lowercase letters, digits and single hyphens"
        )))
    }
}

/// Validate a post title and return it trimmed.
pub fn validate_title(title: &str) -> Result<String, CoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CoreError::Validation("title is required".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    if slugify(title).is_empty() {
        return Err(CoreError::Validation(
            "title must contain at least one letter or digit".into(),
        ));
    }
    Ok(title.to_string())
}

/// First [`EXCERPT_LEN`] characters of `content` with whitespace collapsed,
/// cut at a word boundary and suffixed with an ellipsis when truncated.
pub fn excerpt(content: &str) -> String {
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= EXCERPT_LEN {
        return collapsed;
    }
    let cut: String = collapsed.chars().take(EXCERPT_LEN).collect();
    let cut = match cut.rfind(' ') {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{cut}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust & Startups: 2026 "), "rust-startups-2026");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn slug_validation() {
        assert!(validate_slug("hiring-interns-2026").is_ok());
        assert!(validate_slug("Hiring").is_err());
        assert!(validate_slug("double--hyphen").is_err());
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn title_validation() {
        assert_eq!(validate_title("  Launch day ").unwrap(), "Launch day");
        assert!(validate_title("   ").is_err());
        assert!(validate_title("!!!").is_err());
    }

    #[test]
    fn excerpt_short_content_is_unchanged() {
        assert_eq!(excerpt("A  short\npost."), "A short post.");
    }

    #[test]
    fn excerpt_truncates_at_word_boundary() {
        let content = "word ".repeat(100);
        let ex = excerpt(&content);
        assert!(ex.ends_with('…'));
        assert!(ex.chars().count() <= EXCERPT_LEN + 1);
        assert!(!ex.contains("wor…"));
    }
}
