//! Property document routes.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use immoloc_core::document::{DocumentCategory, DocumentService, PropertyDocument};
use immoloc_db::DocumentRepository;
use immoloc_shared::AppError;
use immoloc_shared::types::{DocumentId, PropertyId};
use serde::Serialize;
use tracing::info;

use super::upload::{UPLOAD_BODY_LIMIT, read_upload_form};
use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;

/// Creates the document routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/properties/{property_id}/documents",
            get(list_documents)
                .post(upload_document)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/documents/{document_id}", delete(delete_document))
}

/// A document with its download URL.
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    /// Stored document.
    #[serde(flatten)]
    pub document: PropertyDocument,
    /// Public URL of the file.
    pub public_url: String,
}

fn service(state: &AppState) -> ApiResult<DocumentService<DocumentRepository>> {
    let storage = state
        .storage
        .clone()
        .ok_or_else(ApiError::storage_unavailable)?;
    Ok(DocumentService::new(
        storage,
        Arc::new(DocumentRepository::new((*state.db).clone())),
    ))
}

fn with_url(
    service: &DocumentService<DocumentRepository>,
    document: PropertyDocument,
) -> DocumentResponse {
    DocumentResponse {
        public_url: service.public_url(&document),
        document,
    }
}

/// GET /properties/{property_id}/documents - Every category, newest first in each.
async fn list_documents(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(property_id): Path<PropertyId>,
) -> ApiResult<Json<BTreeMap<&'static str, Vec<DocumentResponse>>>> {
    let service = service(&state)?;
    let groups = service.list(&auth.session(), property_id).await?;

    Ok(Json(
        groups
            .into_iter()
            .map(|(category, documents)| {
                let documents = documents
                    .into_iter()
                    .map(|d| with_url(&service, d))
                    .collect();
                (category.as_str(), documents)
            })
            .collect(),
    ))
}

/// POST /properties/{property_id}/documents - multipart `category` + `file`.
async fn upload_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(property_id): Path<PropertyId>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let service = service(&state)?;
    let mut form = read_upload_form(multipart).await?;

    let raw = form.fields.get("category").map(String::as_str).unwrap_or_default();
    let category = DocumentCategory::parse(raw)
        .ok_or_else(|| AppError::Validation(format!("Catégorie de document inconnue : {raw}")))?;
    let file = form.require_file()?;

    let session = auth.session();
    let document = service
        .upload(&session, property_id, category, file)
        .await?;
    info!(
        user_id = %session.user_id,
        property_id = %property_id,
        document_id = %document.id,
        category = %category,
        "Document uploaded"
    );

    Ok((StatusCode::CREATED, Json(with_url(&service, document))))
}

/// DELETE /documents/{document_id}
async fn delete_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(document_id): Path<DocumentId>,
) -> ApiResult<StatusCode> {
    let session = auth.session();
    service(&state)?.delete(&session, document_id).await?;
    info!(user_id = %session.user_id, document_id = %document_id, "Document deleted");
    Ok(StatusCode::NO_CONTENT)
}
