//! Handler for `POST /uploads/{bucket}`.
//!
//! Accepts a multipart form with a required `file` field. The object is
//! stored at `{user_id}/{uuid}.{ext}` in the bucket; avatar, resume and
//! logo uploads are also written to the caller's profile.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use upstart_core::error::CoreError;
use upstart_core::storage::{content_type_for, object_path, Bucket, BucketOwner};
use upstart_db::repositories::{AdminRepo, CompanyRepo, StudentRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadedObject {
    pub bucket: String,
    pub path: String,
    pub url: String,
}

/// POST /api/v1/uploads/{bucket}
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(bucket): Path<String>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadedObject>>)> {
    let bucket: Bucket = bucket.parse()?;
    let user_id = auth.user.id;

    let allowed = match bucket.owner() {
        BucketOwner::Role(role) => auth.user.role == Some(role),
        BucketOwner::Admin => AdminRepo::is_admin(&state.pool, user_id).await?,
    };
    if !allowed {
        tracing::warn!(user_id = %user_id, %bucket, "Upload to a bucket the caller does not own");
        return Err(CoreError::Forbidden(format!("Uploads to '{bucket}' are not permitted")).into());
    }

    let mut file_data: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file_data = Some((filename, data.to_vec()));
        }
    }

    let (filename, data) =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    let ext = bucket.validate_upload(&filename, data.len())?;
    let path = object_path(user_id, &ext);
    let size = data.len();
    state
        .blobs
        .upload(bucket, &path, data, content_type_for(&ext))
        .await?;
    let url = state.blobs.public_url(bucket, &path);

    attach_to_profile(&state, &auth, bucket, &url).await?;

    tracing::info!(user_id = %user_id, %bucket, path = %path, size, "File uploaded");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UploadedObject {
                bucket: bucket.to_string(),
                path,
                url,
            },
        }),
    ))
}

/// Record the public URL on the profile column matching `bucket`.
async fn attach_to_profile(
    state: &AppState,
    auth: &AuthUser,
    bucket: Bucket,
    url: &str,
) -> AppResult<()> {
    let BucketOwner::Role(role) = bucket.owner() else {
        return Ok(());
    };
    let id = auth.user.id;
    state.profiles.ensure_profile(id, role).await?;
    match bucket {
        Bucket::Avatars => {
            StudentRepo::set_avatar_url(&state.pool, id, url).await?;
        }
        Bucket::Resumes => {
            StudentRepo::set_resume_url(&state.pool, id, url).await?;
        }
        Bucket::Logos => {
            CompanyRepo::set_logo_url(&state.pool, id, url).await?;
        }
        Bucket::BlogImages => {}
    }
    Ok(())
}
