//! Document metadata: list per entity, create, and combined upload + create.

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use serde::Deserialize;

use paddock_core::{DocumentType, EntityKind, EntityRef, UploadPurpose, UploadRejection};

use super::uploads::{ReceivedFile, multipart_error, read_file_field};
use crate::error::AppError;
use crate::extract::JsonBody;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, Document, DocumentWithUploader, NewDocument};
use crate::state::AppState;

/// Body of `POST /api/documents`.
#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
    pub document_type: DocumentType,
    /// URL returned by an earlier upload. Trusted as given.
    pub file_url: String,
    pub entity_type: EntityKind,
    pub entity_id: i32,
}

/// List the documents attached to one user or horse, oldest first.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path((entity_type, entity_id)): Path<(String, i32)>,
) -> Result<Json<Vec<DocumentWithUploader>>, AppError> {
    let kind: EntityKind = entity_type
        .parse()
        .map_err(|e| AppError::Validation(format!("{e}")))?;

    let documents = state
        .store()
        .list_documents(EntityRef::new(kind, entity_id))
        .await?;
    Ok(Json(documents))
}

/// Record an already uploaded file against a user or horse.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    JsonBody(request): JsonBody<CreateDocumentRequest>,
) -> Result<Json<Document>, AppError> {
    let title = validated_title(&request.title)?;
    if request.file_url.trim().is_empty() {
        return Err(AppError::Validation("file_url is required".to_string()));
    }
    let entity = EntityRef::new(request.entity_type, request.entity_id);
    ensure_entity_exists(&state, entity).await?;

    let document = state
        .store()
        .create_document(NewDocument {
            title,
            document_type: request.document_type,
            file_url: request.file_url,
            entity,
            uploaded_by_id: user.id,
        })
        .await?;

    tracing::info!(document_id = %document.id, %entity, "document created");
    Ok(Json(document))
}

/// Upload a file and record it in one request.
///
/// Metadata and the owning entity are checked before the file is stored.
/// If the row cannot be inserted the stored file is removed again.
pub async fn upload_and_create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    mut multipart: Multipart,
) -> Result<Json<Document>, AppError> {
    let form = read_document_form(&state, &mut multipart).await?;
    ensure_entity_exists(&state, form.entity).await?;

    let file_url = state
        .files()
        .put(UploadPurpose::Document, &form.file.extension, &form.file.bytes)
        .await?;

    let created = state
        .store()
        .create_document(NewDocument {
            title: form.title,
            document_type: form.document_type,
            file_url: file_url.clone(),
            entity: form.entity,
            uploaded_by_id: user.id,
        })
        .await;

    match created {
        Ok(document) => {
            tracing::info!(
                document_id = %document.id,
                entity = %form.entity,
                url = %file_url,
                "document uploaded"
            );
            Ok(Json(document))
        }
        Err(e) => {
            discard_upload(&state, &file_url, &user).await;
            Err(e.into())
        }
    }
}

/// Best-effort removal of a file whose metadata insert failed.
async fn discard_upload(state: &AppState, url: &str, user: &CurrentUser) {
    match state.files().remove(url).await {
        Ok(()) => tracing::warn!(%url, user_id = %user.id, "removed upload after failed insert"),
        Err(e) => tracing::error!(%url, error = %e, "could not remove orphaned upload"),
    }
}

async fn ensure_entity_exists(state: &AppState, entity: EntityRef) -> Result<(), AppError> {
    if state.store().entity_exists(entity).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("{entity} does not exist")))
    }
}

fn validated_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }
    Ok(title.to_owned())
}

struct DocumentForm {
    title: String,
    document_type: DocumentType,
    entity: EntityRef,
    file: ReceivedFile,
}

/// Collect the text fields and the `document` file part, in any order.
async fn read_document_form(
    state: &AppState,
    multipart: &mut Multipart,
) -> Result<DocumentForm, AppError> {
    let limits = state.config().upload_limits;
    let mut title = None;
    let mut document_type = None;
    let mut entity_type = None;
    let mut entity_id = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e, limits))?
    {
        let name = field.name().unwrap_or_default().to_owned();
        if name == UploadPurpose::Document.field_name() {
            file = Some(read_file_field(field, UploadPurpose::Document, limits).await?);
            continue;
        }

        let slot = match name.as_str() {
            "title" => &mut title,
            "document_type" => &mut document_type,
            "entity_type" => &mut entity_type,
            "entity_id" => &mut entity_id,
            _ => continue,
        };
        *slot = Some(
            field
                .text()
                .await
                .map_err(|e| multipart_error(&e, limits))?,
        );
    }

    let required = |value: Option<String>, name: &str| {
        value.ok_or_else(|| AppError::Validation(format!("{name} is required")))
    };

    let title = validated_title(&required(title, "title")?)?;
    let document_type = required(document_type, "document_type")?
        .parse::<DocumentType>()
        .map_err(|e| AppError::Validation(format!("{e}")))?;
    let kind = required(entity_type, "entity_type")?
        .parse::<EntityKind>()
        .map_err(|e| AppError::Validation(format!("{e}")))?;
    let id = required(entity_id, "entity_id")?
        .trim()
        .parse::<i32>()
        .map_err(|_| AppError::Validation("entity_id must be an integer".to_string()))?;
    let file = file.ok_or(UploadRejection::MissingFile)?;

    Ok(DocumentForm {
        title,
        document_type,
        entity: EntityRef::new(kind, id),
        file,
    })
}
