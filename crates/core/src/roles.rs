//! Marketplace roles and onboarding status.
//!
//! Both values are stored in the identity provider's per-user metadata blob
//! under the keys [`METADATA_ROLE`] and [`METADATA_ONBOARDING_STATUS`], using
//! the lowercase string forms below.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Metadata key holding the user's [`Role`].
pub const METADATA_ROLE: &str = "role";
/// Metadata key holding the user's [`OnboardingStatus`].
pub const METADATA_ONBOARDING_STATUS: &str = "onboarding_status";

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_STARTUP: &str = "startup";

/// Which side of the marketplace a user is on. Assigned once at signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Startup,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => ROLE_STUDENT,
            Role::Startup => ROLE_STARTUP,
        }
    }

    /// Path prefix of the role's own area (`/student`, `/startup`).
    pub fn area_prefix(self) -> String {
        format!("/{}", self.as_str())
    }

    /// `/{role}/dashboard`
    pub fn dashboard_path(self) -> String {
        format!("/{}/dashboard", self.as_str())
    }

    /// `/{role}/profile`
    pub fn profile_path(self) -> String {
        format!("/{}/profile", self.as_str())
    }

    /// Where a user lands once onboarding is complete.
    ///
    /// Students are sent to their profile to finish filling it in; startups
    /// go straight to their dashboard.
    pub fn completion_path(self) -> String {
        match self {
            Role::Student => self.profile_path(),
            Role::Startup => self.dashboard_path(),
        }
    }

    /// Whether `path` belongs to this role's area.
    pub fn owns_path(self, path: &str) -> bool {
        let prefix = self.area_prefix();
        path == prefix
            || path
                .strip_prefix(&prefix)
                .is_some_and(|rest| rest.starts_with('/') || rest.starts_with('?'))
    }

    /// The role whose area `path` lies in, if any.
    pub fn for_path(path: &str) -> Option<Role> {
        [Role::Student, Role::Startup]
            .into_iter()
            .find(|role| role.owns_path(path))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            ROLE_STUDENT => Ok(Role::Student),
            ROLE_STARTUP => Ok(Role::Startup),
            other => Err(CoreError::Validation(format!(
                "Invalid role '{other}'. Must be one of: {ROLE_STUDENT}, {ROLE_STARTUP}"
            ))),
        }
    }
}

pub const STATUS_NOT_STARTED: &str = "not_started";
pub const STATUS_COMPLETE: &str = "complete";

/// Progress through the one-time post-signup profile completion step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStatus {
    NotStarted,
    Complete,
}

impl OnboardingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OnboardingStatus::NotStarted => STATUS_NOT_STARTED,
            OnboardingStatus::Complete => STATUS_COMPLETE,
        }
    }
}

impl fmt::Display for OnboardingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OnboardingStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_NOT_STARTED => Ok(OnboardingStatus::NotStarted),
            STATUS_COMPLETE => Ok(OnboardingStatus::Complete),
            other => Err(CoreError::Validation(format!(
                "Invalid onboarding status '{other}'"
            ))),
        }
    }
}
