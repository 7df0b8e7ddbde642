//! Accounting entry routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use immoloc_core::entry::{
    AccountingEntry, CommitOutcome, CommitTarget, EntryDraft, EntryService, FieldEdit,
};
use immoloc_db::EntryRepository;
use immoloc_shared::types::{BilanId, EntryId, PropertyId};
use serde::Deserialize;
use tracing::info;

use super::attachments;
use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// Creates the entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bilans/{bilan_id}/entries", get(list_entries))
        .route("/bilans/{bilan_id}/entries/draft", post(new_draft))
        .route("/bilans/{bilan_id}/entries/commit", post(commit_entry))
        .route("/entries/{entry_id}", delete(delete_entry))
}

/// Filter for the entry list.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Only entries of this property.
    pub property_id: Option<PropertyId>,
}

/// Body of a draft request.
#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    /// Property the new line is for.
    pub property_id: PropertyId,
}

/// Body of a commit: the edits made to one line since the last save.
#[derive(Debug, Deserialize)]
pub struct CommitRequest {
    /// Property of the line.
    pub property_id: PropertyId,
    /// Saved line being edited, absent for a new one.
    #[serde(default)]
    pub entry_id: Option<EntryId>,
    /// Field edits in the order they were typed.
    pub edits: Vec<FieldEdit>,
}

fn service(state: &AppState) -> EntryService<EntryRepository> {
    EntryService::new(Arc::new(EntryRepository::new((*state.db).clone())))
}

/// GET /bilans/{bilan_id}/entries?property_id=
async fn list_entries(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(bilan_id): Path<BilanId>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<AccountingEntry>>> {
    Ok(Json(
        service(&state)
            .list(&auth.session(), bilan_id, query.property_id)
            .await?,
    ))
}

/// POST /bilans/{bilan_id}/entries/draft - A blank line; nothing is stored yet.
async fn new_draft(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(bilan_id): Path<BilanId>,
    Json(body): Json<DraftRequest>,
) -> ApiResult<Json<EntryDraft>> {
    Ok(Json(
        service(&state)
            .new_draft(&auth.session(), bilan_id, body.property_id)
            .await?,
    ))
}

/// POST /bilans/{bilan_id}/entries/commit
///
/// Saves the line once it has a date; until then the draft is handed back.
async fn commit_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(bilan_id): Path<BilanId>,
    Json(body): Json<CommitRequest>,
) -> ApiResult<Json<CommitOutcome>> {
    let target = CommitTarget {
        bilan_id,
        property_id: body.property_id,
        entry_id: body.entry_id,
    };
    Ok(Json(
        service(&state)
            .commit(&auth.session(), target, &body.edits)
            .await?,
    ))
}

/// DELETE /entries/{entry_id}
///
/// Attachment rows go with the entry; their stored files are removed afterwards.
async fn delete_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(entry_id): Path<EntryId>,
) -> ApiResult<StatusCode> {
    let session = auth.session();
    let entry = service(&state).delete(&session, entry_id).await?;

    if !entry.attachments.is_empty() {
        match attachments::service(&state) {
            Ok(files) => files.remove_objects(&entry.attachments).await,
            Err(_) => tracing::warn!(
                entry_id = %entry_id,
                count = entry.attachments.len(),
                "Storage not configured, attachment files left in place"
            ),
        }
    }

    info!(user_id = %session.user_id, entry_id = %entry_id, "Entry deleted");
    Ok(StatusCode::NO_CONTENT)
}
