//! Blob store backed by a Supabase-Storage-compatible object API.

use async_trait::async_trait;
use upstart_core::storage::{check_object_path, BlobError, BlobStore, Bucket};

use reqwest::Url;

use crate::{error_message, join_url, parse_base_url, InvalidBaseUrl};

/// HTTP client for the `/storage/v1` API.
///
/// Uploads are authorised with the service key, so bucket policies are
/// bypassed; callers enforce ownership before uploading.
pub struct StorageClient {
    client: reqwest::Client,
    base_url: Url,
    service_key: String,
}

impl StorageClient {
    pub fn new(base_url: &str, service_key: String) -> Result<Self, InvalidBaseUrl> {
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: parse_base_url(base_url)?,
            service_key,
        })
    }

    fn object_url(&self, bucket: Bucket, path: &str) -> Url {
        join_url(&self.base_url, &format!("storage/v1/object/{bucket}/{path}"))
    }
}

#[async_trait]
impl BlobStore for StorageClient {
    async fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BlobError> {
        check_object_path(path)?;
        let size = bytes.len();

        let response = self
            .client
            .post(self.object_url(bucket, path))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| BlobError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(BlobError::Rejected {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        tracing::debug!(%bucket, path, size, "Uploaded object");
        Ok(())
    }

    fn public_url(&self, bucket: Bucket, path: &str) -> String {
        join_url(
            &self.base_url,
            &format!("storage/v1/object/public/{bucket}/{path}"),
        )
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn client() -> StorageClient {
        StorageClient::new("https://demo.supabase.co", "service".into()).unwrap()
    }

    #[test]
    fn urls() {
        let c = client();
        assert_eq!(
            c.object_url(Bucket::BlogImages, "u/1.png").as_str(),
            "https://demo.supabase.co/storage/v1/object/blog-images/u/1.png"
        );
        assert_eq!(
            c.public_url(Bucket::Resumes, "u/cv.pdf"),
            "https://demo.supabase.co/storage/v1/object/public/resumes/u/cv.pdf"
        );
    }

    #[tokio::test]
    async fn rejects_traversal_before_any_request() {
        let result = client()
            .upload(Bucket::Avatars, "../escape.png", vec![1], "image/png")
            .await;
        assert_matches!(result, Err(BlobError::InvalidPath(_)));
    }
}
