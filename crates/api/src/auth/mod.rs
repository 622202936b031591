//! Built-in identity provider.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access-token signing/validation and refresh-token hashing.
//! - [`local_provider`] -- [`IdentityProvider`](upstart_core::identity::IdentityProvider)
//!   over the `auth_users` / `auth_sessions` tables.

pub mod jwt;
pub mod local_provider;
pub mod password;
