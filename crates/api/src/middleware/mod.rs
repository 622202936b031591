//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the session behind a Bearer token.
//! - [`auth::OptionalBearer`] -- the raw Bearer token, if any.
//! - [`identity::CurrentIdentity`] -- the session plus the role's profile row.
//! - [`rbac::RequireStudent`] / [`rbac::RequireStartup`] -- onboarded users of one role.
//! - [`rbac::RequireAdmin`] -- members of the admin allow-list.

pub mod auth;
pub mod identity;
pub mod rbac;
