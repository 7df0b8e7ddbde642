//! Entry attachment routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use immoloc_core::attachment::{Attachment, AttachmentService};
use immoloc_db::AttachmentRepository;
use immoloc_shared::types::{AttachmentId, EntryId};
use serde::Serialize;
use tracing::info;

use super::upload::{UPLOAD_BODY_LIMIT, read_upload_form};
use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;

/// Creates the attachment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/entries/{entry_id}/attachments",
            get(list_attachments)
                .post(upload_attachment)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/attachments/{attachment_id}", delete(delete_attachment))
}

/// An attachment with its download URL.
#[derive(Debug, Serialize)]
pub struct AttachmentResponse {
    /// Stored attachment.
    #[serde(flatten)]
    pub attachment: Attachment,
    /// Public URL of the file.
    pub public_url: String,
}

/// Attachment service over the database, if storage is configured.
pub(crate) fn service(state: &AppState) -> ApiResult<AttachmentService<AttachmentRepository>> {
    let storage = state
        .storage
        .clone()
        .ok_or_else(ApiError::storage_unavailable)?;
    Ok(AttachmentService::new(
        storage,
        Arc::new(AttachmentRepository::new((*state.db).clone())),
    ))
}

/// GET /entries/{entry_id}/attachments - Newest first.
async fn list_attachments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(entry_id): Path<EntryId>,
) -> ApiResult<Json<Vec<AttachmentResponse>>> {
    let service = service(&state)?;
    let attachments = service.list(&auth.session(), entry_id).await?;

    Ok(Json(
        attachments
            .into_iter()
            .map(|attachment| AttachmentResponse {
                public_url: service.public_url(&attachment),
                attachment,
            })
            .collect(),
    ))
}

/// POST /entries/{entry_id}/attachments - multipart `file`.
///
/// Only entries already saved in an open ledger accept files.
async fn upload_attachment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(entry_id): Path<EntryId>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let service = service(&state)?;
    let file = read_upload_form(multipart).await?.require_file()?;

    let session = auth.session();
    let attachment = service.upload(&session, entry_id, file).await?;
    info!(
        user_id = %session.user_id,
        entry_id = %entry_id,
        attachment_id = %attachment.id,
        size = attachment.file_size,
        "Attachment uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(AttachmentResponse {
            public_url: service.public_url(&attachment),
            attachment,
        }),
    ))
}

/// DELETE /attachments/{attachment_id}
async fn delete_attachment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(attachment_id): Path<AttachmentId>,
) -> ApiResult<StatusCode> {
    let session = auth.session();
    service(&state)?.delete(&session, attachment_id).await?;
    info!(user_id = %session.user_id, attachment_id = %attachment_id, "Attachment deleted");
    Ok(StatusCode::NO_CONTENT)
}
