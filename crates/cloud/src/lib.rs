//! HTTP clients for the hosted auth and storage services.
//!
//! [`gotrue::GoTrueClient`] implements the identity provider seam against a
//! GoTrue-compatible REST API and [`storage::StorageClient`] implements the
//! blob store seam against a Supabase-Storage-compatible one. Both use
//! [`reqwest`].

pub mod gotrue;
pub mod storage;

use reqwest::Url;

/// Pull a human-readable message out of an error body.
///
/// Hosted services report errors under several keys; fall back to the raw
/// body when none is present.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error_description", "msg", "message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    if body.is_empty() {
        "<empty body>".to_string()
    } else {
        body.to_string()
    }
}

/// A configured service URL could not be used as a base.
#[derive(Debug, thiserror::Error)]
#[error("Invalid base URL '{url}': {reason}")]
pub struct InvalidBaseUrl {
    pub url: String,
    pub reason: String,
}

/// Parse a service base URL, ensuring its path ends in `/` so relative
/// joins append rather than replace the last segment.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, InvalidBaseUrl> {
    let invalid = |reason: String| InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };
    let mut url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("not a hierarchical URL".into()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Append `path` to a base produced by [`parse_base_url`].
pub(crate) fn join_url(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    url.set_path(&format!("{}{}", base.path(), path.trim_start_matches('/')));
    url
}
