//! Company (startup) profile model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use upstart_core::types::{Timestamp, UserId};

/// A row from the `companies` table. `id` is the identity user id.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Company {
    pub id: UserId,
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub location: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for updating a company profile. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCompany {
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub location: Option<String>,
}
