//! Application document routes.
//!
//! Uploads are multipart forms with a `file` part and a `document_type` part.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use bytes::Bytes;
use uuid::Uuid;

use crate::{ApiError, ApiResult, AppState, middleware::AuthUser};
use jobboard_core::document::{Document, DocumentService, DocumentType};
use jobboard_core::storage::UploadedFile;
use jobboard_db::DocumentRepository;

/// Room for multipart boundaries, part headers and the `document_type` part.
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

/// Creates the document routes.
///
/// The upload body limit leaves headroom above `max_file_size` so a file
/// slightly over the limit is rejected by validation with a clear message.
pub fn routes(max_file_size: u64) -> Router<AppState> {
    let body_limit =
        usize::try_from(max_file_size.saturating_add(MULTIPART_OVERHEAD)).unwrap_or(usize::MAX);

    Router::new()
        .route(
            "/applications/{id}/documents",
            get(list_documents)
                .post(upload_document)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            "/documents/{id}",
            get(download_document).delete(delete_document),
        )
}

fn service(state: &AppState) -> DocumentService<DocumentRepository> {
    DocumentService::new(
        state.storage.clone(),
        Arc::new(DocumentRepository::new((*state.db).clone())),
    )
}

/// Collects the `file` and `document_type` parts of an upload form.
async fn read_upload_form(mut multipart: Multipart) -> ApiResult<(DocumentType, UploadedFile)> {
    let mut document_type = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(e.body_text()))?
    {
        match field.name() {
            Some("document_type") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(e.body_text()))?;
                document_type = Some(DocumentType::parse(&raw).ok_or_else(|| {
                    ApiError::validation("document_type must be CV or COVER_LETTER")
                })?);
            }
            Some("file") => {
                let name = field.file_name().unwrap_or("document").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes: Bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(e.body_text()))?;
                file = Some(UploadedFile::new(name, mime_type, bytes));
            }
            _ => {}
        }
    }

    match (document_type, file) {
        (Some(document_type), Some(file)) => Ok((document_type, file)),
        (None, _) => Err(ApiError::validation("document_type is required")),
        (_, None) => Err(ApiError::validation("file is required")),
    }
}

/// Filename safe to put in a quoted header parameter.
fn attachment_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim().is_empty() {
        "document".to_string()
    } else {
        cleaned
    }
}

/// POST /applications/{id}/documents
async fn upload_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(application_id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Document>)> {
    let (document_type, file) = read_upload_form(multipart).await?;
    let document = service(&state)
        .upload(&auth.actor(), application_id, document_type, file)
        .await?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// GET /applications/{id}/documents
async fn list_documents(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(application_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Document>>> {
    Ok(Json(
        service(&state)
            .list(&auth.actor(), application_id)
            .await?,
    ))
}

/// GET /documents/{id}
async fn download_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let content = service(&state).get(&auth.actor(), id).await?;
    let document = content.document;

    let content_type = HeaderValue::from_str(&document.mime_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        attachment_filename(&document.original_name)
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(content.bytes),
    )
        .into_response())
}

/// DELETE /documents/{id}
async fn delete_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    service(&state).delete(&auth.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
