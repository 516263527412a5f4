//! Multipart file uploads.
//!
//! `POST /api/upload/profile` takes an image under the `profile` field,
//! `POST /api/upload/document` an allow-listed document under `document`.
//! Both answer `{"url": "/uploads/<dir>/<name>"}`.

use axum::{
    Json,
    extract::{
        DefaultBodyLimit, State,
        multipart::{Field, Multipart, MultipartError},
    },
    http::StatusCode,
};
use serde::Serialize;

use paddock_core::{UploadLimits, UploadPurpose, UploadRejection, sanitized_extension};

use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Room for multipart boundaries and the metadata text fields.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Response body of a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// A file part that passed type and size checks, held in memory.
#[derive(Debug)]
pub struct ReceivedFile {
    pub mime: String,
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// Body limit for routes accepting uploads under `limits`.
///
/// The per-file ceiling is enforced while reading; this only stops
/// bodies that could never be accepted.
#[must_use]
pub fn body_limit(limits: UploadLimits) -> DefaultBodyLimit {
    DefaultBodyLimit::max(limits.largest() + MULTIPART_OVERHEAD_BYTES)
}

/// Translate a multipart parse error, treating an exceeded body limit as an
/// oversized file.
pub(crate) fn multipart_error(err: &MultipartError, limits: UploadLimits) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Upload(UploadRejection::TooLarge {
            max_bytes: limits.largest(),
        })
    } else {
        AppError::Validation(err.body_text())
    }
}

/// Validate and read one file part.
///
/// The MIME type is checked before any byte is read; the body is read chunk
/// by chunk and abandoned as soon as it passes the ceiling.
pub(crate) async fn read_file_field(
    mut field: Field<'_>,
    purpose: UploadPurpose,
    limits: UploadLimits,
) -> Result<ReceivedFile, AppError> {
    let mime = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_owned();
    purpose.check_mime(&mime)?;

    let extension = field.file_name().map(sanitized_extension).unwrap_or_default();
    let max_bytes = limits.max_bytes(&mime);

    let mut bytes: Vec<u8> = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(&e, limits))?
    {
        if bytes.len().saturating_add(chunk.len()) > max_bytes {
            return Err(UploadRejection::TooLarge { max_bytes }.into());
        }
        bytes.extend_from_slice(&chunk);
    }

    if bytes.is_empty() {
        return Err(UploadRejection::EmptyFile.into());
    }

    Ok(ReceivedFile {
        mime,
        extension,
        bytes,
    })
}

/// Find the part named after `purpose` and read it; other parts are skipped.
async fn read_single_file(
    multipart: &mut Multipart,
    purpose: UploadPurpose,
    limits: UploadLimits,
) -> Result<ReceivedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e, limits))?
    {
        if field.name() == Some(purpose.field_name()) {
            return read_file_field(field, purpose, limits).await;
        }
    }
    Err(UploadRejection::MissingFile.into())
}

async fn upload(
    state: &AppState,
    multipart: &mut Multipart,
    purpose: UploadPurpose,
) -> Result<Json<UploadResponse>, AppError> {
    let limits = state.config().upload_limits;
    let file = read_single_file(multipart, purpose, limits).await?;

    let url = state
        .files()
        .put(purpose, &file.extension, &file.bytes)
        .await?;

    tracing::info!(
        %url,
        mime = %file.mime,
        size = file.bytes.len(),
        "file uploaded"
    );
    Ok(Json(UploadResponse { url }))
}

/// Upload a profile image.
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    upload(&state, &mut multipart, UploadPurpose::Profile).await
}

/// Upload a document (invoice, certificate, contract).
pub async fn document(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    upload(&state, &mut multipart, UploadPurpose::Document).await
}
