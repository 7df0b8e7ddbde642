//! Archive of finalized ledgers.

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use immoloc_core::archive::{ArchiveService, ArchivedBilan};
use immoloc_db::ArchiveRepository;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// Creates the archive routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/archives", get(list_archives))
}

/// GET /archives - Finalized ledgers, newest year first, entries grouped by property.
async fn list_archives(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<ArchivedBilan>>> {
    let service = ArchiveService::new(Arc::new(ArchiveRepository::new((*state.db).clone())));
    Ok(Json(service.list(&auth.session()).await?))
}
