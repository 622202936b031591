//! Filesystem blob store, served back through `ServeDir` at `/uploads`.

use std::path::PathBuf;

use async_trait::async_trait;
use upstart_core::storage::{check_object_path, BlobError, BlobStore, Bucket};

/// URL prefix under which [`LocalBlobStore`] files are served.
pub const UPLOADS_ROUTE: &str = "/uploads";

pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), BlobError> {
        check_object_path(path)?;
        let target = self.root.join(bucket.as_str()).join(path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &bytes).await?;
        tracing::debug!(%bucket, path, size = bytes.len(), "Stored upload");
        Ok(())
    }

    fn public_url(&self, bucket: Bucket, path: &str) -> String {
        format!(
            "{}{UPLOADS_ROUTE}/{bucket}/{path}",
            self.public_base_url.trim_end_matches('/')
        )
    }
}
