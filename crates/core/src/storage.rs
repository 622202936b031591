//! Blob store seam and upload rules.
//!
//! Uploaded files live in named buckets; each bucket accepts a fixed set of
//! file extensions and is writable by one kind of user.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::UserId;

/// Maximum accepted upload size (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Avatars,
    Resumes,
    Logos,
    BlogImages,
}

/// Who may write to a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketOwner {
    Role(Role),
    Admin,
}

impl Bucket {
    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Avatars => "avatars",
            Bucket::Resumes => "resumes",
            Bucket::Logos => "logos",
            Bucket::BlogImages => "blog-images",
        }
    }

    pub fn owner(self) -> BucketOwner {
        match self {
            Bucket::Avatars | Bucket::Resumes => BucketOwner::Role(Role::Student),
            Bucket::Logos => BucketOwner::Role(Role::Startup),
            Bucket::BlogImages => BucketOwner::Admin,
        }
    }

    pub fn allowed_extensions(self) -> &'static [&'static str] {
        match self {
            Bucket::Resumes => DOCUMENT_EXTENSIONS,
            _ => IMAGE_EXTENSIONS,
        }
    }

    /// Check an upload against this bucket's rules and return the lowercased
    /// extension.
    pub fn validate_upload(self, filename: &str, size: usize) -> Result<String, CoreError> {
        if size == 0 {
            return Err(CoreError::Validation("Uploaded file is empty".into()));
        }
        if size > MAX_UPLOAD_BYTES {
            return Err(CoreError::Validation(format!(
                "File exceeds the {} MiB limit",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        let allowed = self.allowed_extensions();
        if !allowed.contains(&ext.as_str()) {
            return Err(CoreError::Validation(format!(
                "Unsupported file type '.{ext}' for {self}. Supported: {allowed:?}"
            )));
        }
        Ok(ext)
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avatars" => Ok(Bucket::Avatars),
            "resumes" => Ok(Bucket::Resumes),
            "logos" => Ok(Bucket::Logos),
            "blog-images" => Ok(Bucket::BlogImages),
            other => Err(CoreError::Validation(format!("Unknown bucket '{other}'"))),
        }
    }
}

/// Object key for an upload: `{user_id}/{unique}.{ext}`.
pub fn object_path(user_id: UserId, ext: &str) -> String {
    format!("{user_id}/{}.{ext}", uuid::Uuid::new_v4())
}

/// Reject object keys that could escape their bucket.
pub fn check_object_path(path: &str) -> Result<(), BlobError> {
    let bad = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad {
        Err(BlobError::InvalidPath(path.to_string()))
    } else {
        Ok(())
    }
}

/// Guess a MIME type from a validated extension.
pub fn content_type_for(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("Blob store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Blob store rejected upload ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Blob store request failed: {0}")]
    Transport(String),

    #[error("Invalid object path '{0}'")]
    InvalidPath(String),
}

/// Object storage returning public URLs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` at `bucket/path`, replacing any existing object.
    async fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BlobError>;

    /// Public URL under which `bucket/path` is served.
    fn public_url(&self, bucket: Bucket, path: &str) -> String;
}
