//! Role profile persistence behind a trait, so the session resolver can run
//! against Postgres in production and an in-memory store in tests.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use upstart_core::onboarding::OnboardingSubmission;
use upstart_core::roles::Role;
use upstart_core::types::UserId;

use crate::models::company::Company;
use crate::models::student::Student;
use crate::repositories::{CompanyRepo, StudentRepo};

/// The profile row that belongs to a user's role.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", content = "profile", rename_all = "lowercase")]
pub enum Profile {
    Student(Student),
    #[serde(rename = "startup")]
    Company(Company),
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Return the role's profile row for `user_id`, creating an empty one if
    /// it does not exist. Safe to call any number of times.
    async fn ensure_profile(&self, user_id: UserId, role: Role) -> Result<Profile, sqlx::Error>;

    /// Persist the onboarding form fields onto the profile row.
    async fn complete_onboarding(
        &self,
        user_id: UserId,
        submission: &OnboardingSubmission,
    ) -> Result<Profile, sqlx::Error>;
}

/// [`ProfileStore`] over the `students` and `companies` tables.
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn ensure_profile(&self, user_id: UserId, role: Role) -> Result<Profile, sqlx::Error> {
        tracing::debug!(%user_id, %role, "Ensuring profile row");
        match role {
            Role::Student => StudentRepo::ensure(&self.pool, user_id)
                .await
                .map(Profile::Student),
            Role::Startup => CompanyRepo::ensure(&self.pool, user_id)
                .await
                .map(Profile::Company),
        }
    }

    async fn complete_onboarding(
        &self,
        user_id: UserId,
        submission: &OnboardingSubmission,
    ) -> Result<Profile, sqlx::Error> {
        match submission {
            OnboardingSubmission::Student {
                first_name,
                last_name,
            } => StudentRepo::complete_onboarding(&self.pool, user_id, first_name, last_name)
                .await
                .map(Profile::Student),
            OnboardingSubmission::Startup { company_name } => {
                CompanyRepo::complete_onboarding(&self.pool, user_id, company_name)
                    .await
                    .map(Profile::Company)
            }
        }
    }
}
