//! Upstart domain layer.
//!
//! Pure types and decision logic shared by the store, the remote clients and
//! the HTTP server. Nothing in this crate performs I/O; the external
//! collaborators are described by the [`identity::IdentityProvider`] and
//! [`storage::BlobStore`] traits.

pub mod blog;
pub mod error;
pub mod identity;
pub mod jobs;
pub mod onboarding;
pub mod resolver;
pub mod roles;
pub mod session;
pub mod skills;
pub mod storage;
pub mod types;
