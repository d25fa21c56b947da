//! Image uploads
//!
//! POST /api/uploads/{namespace}: multipart `file` field → validate → SHA256 → local storage
//!
//! Files land at `{upload_root}/{namespace}/{sha256}.{ext}` and are served
//! back under `/static/uploads`.

use axum::extract::{Multipart, Path, State};
use http::StatusCode;
use serde::Serialize;
use shared::error::{ApiResponse, AppError, ErrorCode};

use super::ApiResult;
use crate::auth::CurrentUser;
use crate::state::AppState;
use crate::storage::{MAX_FILE_SIZE, UploadError, UploadNamespace, validate_upload};

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::from(UploadError::TooLarge {
            size: MAX_FILE_SIZE + 1,
            max: MAX_FILE_SIZE,
        });
    }
    AppError::invalid_request(format!("Multipart error: {err}"))
}

/// POST /api/uploads/{namespace}
pub async fn upload(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(namespace): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<UploadResponse> {
    let namespace: UploadNamespace = namespace.parse().map_err(AppError::from)?;

    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await.map_err(multipart_error)?;
            file = Some((filename, data.to_vec()));
            break;
        }
    }

    let (filename, data) = file.ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;
    let ext = validate_upload(&filename, data.len()).map_err(AppError::from)?;

    let blobs = state.blobs.clone();
    let url = tokio::task::spawn_blocking(move || blobs.put(namespace, &ext, &data))
        .await
        .map_err(|e| AppError::internal(format!("Upload task failed: {e}")))?
        .map_err(AppError::from)?;

    tracing::info!(user_id = user.id, namespace = namespace.as_str(), %url, "Image uploaded");
    Ok(ApiResponse::success(UploadResponse { url }))
}
