//! The authenticated user as seen by the identity provider.

use serde::{Deserialize, Serialize};

use crate::roles::{OnboardingStatus, Role, METADATA_ONBOARDING_STATUS, METADATA_ROLE};
use crate::types::UserId;

/// The marketplace-specific slice of the provider's per-user metadata blob.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboarding_status: Option<OnboardingStatus>,
}

impl UserMetadata {
    /// Metadata written when a role is first assigned.
    pub fn new_role(role: Role) -> Self {
        Self {
            role: Some(role),
            onboarding_status: Some(OnboardingStatus::NotStarted),
        }
    }

    /// Metadata written when onboarding is submitted.
    pub fn completed() -> Self {
        Self {
            role: None,
            onboarding_status: Some(OnboardingStatus::Complete),
        }
    }

    /// Read the marketplace keys out of an arbitrary metadata object.
    ///
    /// Providers store metadata as free-form JSON, so unknown keys are
    /// ignored and unrecognised values are treated as absent.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let role = value
            .get(METADATA_ROLE)
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok());
        let onboarding_status = value
            .get(METADATA_ONBOARDING_STATUS)
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok());
        Self {
            role,
            onboarding_status,
        }
    }

    /// Render as a JSON object containing only the keys that are set, so it
    /// can be merged into the provider's blob without clobbering other keys.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}))
    }
}

/// Session user: id, email and the marketplace metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub email: String,
    pub role: Option<Role>,
    pub onboarding_status: Option<OnboardingStatus>,
}

impl SessionUser {
    pub fn from_metadata(id: UserId, email: String, metadata: UserMetadata) -> Self {
        Self {
            id,
            email,
            role: metadata.role,
            onboarding_status: metadata.onboarding_status,
        }
    }

    /// Effective onboarding status. A role without a recorded status has not
    /// started onboarding; a user without a role has no status at all.
    pub fn effective_status(&self) -> Option<OnboardingStatus> {
        self.role
            .map(|_| self.onboarding_status.unwrap_or(OnboardingStatus::NotStarted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn metadata_ignores_unknown_keys_and_values() {
        let md = UserMetadata::from_json(&json!({
            "role": "startup",
            "onboarding_status": "bogus",
            "avatar": "x.png",
        }));
        assert_eq!(md.role, Some(Role::Startup));
        assert_eq!(md.onboarding_status, None);

        let empty = UserMetadata::from_json(&json!(null));
        assert_eq!(empty, UserMetadata::default());
    }

    #[test]
    fn metadata_json_only_contains_set_keys() {
        assert_eq!(
            UserMetadata::completed().to_json(),
            json!({ "onboarding_status": "complete" })
        );
        assert_eq!(
            UserMetadata::new_role(Role::Student).to_json(),
            json!({ "role": "student", "onboarding_status": "not_started" })
        );
    }

    #[test]
    fn effective_status_requires_role() {
        let mut user = SessionUser {
            id: Uuid::new_v4(),
            email: "a@b.co".into(),
            role: None,
            onboarding_status: Some(OnboardingStatus::Complete),
        };
        assert_eq!(user.effective_status(), None);

        user.role = Some(Role::Student);
        user.onboarding_status = None;
        assert_eq!(user.effective_status(), Some(OnboardingStatus::NotStarted));
    }
}
