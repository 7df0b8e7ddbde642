//! Ledger routes: current ledger, free years, coverage, finalization.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::Utc;
use immoloc_core::bilan::{
    Bilan, BilanService, Coverage, FinalizeOutcome, WizardState, current_year,
};
use immoloc_core::Session;
use immoloc_db::BilanRepository;
use immoloc_shared::types::BilanId;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// Creates the ledger routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bilans/current", get(current_bilan))
        .route("/bilans/available-years", get(available_years))
        .route("/bilans/{bilan_id}/coverage", get(coverage))
        .route("/bilans/{bilan_id}/finalize", post(finalize))
}

/// Free fiscal years.
#[derive(Debug, Serialize)]
pub struct AvailableYearsResponse {
    /// Calendar year on the server.
    pub current_year: i32,
    /// Years a ledger may be opened for, newest first.
    pub years: Vec<i32>,
}

/// Finalize options.
#[derive(Debug, Default, Deserialize)]
pub struct FinalizeQuery {
    /// Proceed even if some properties have no entry.
    #[serde(default)]
    pub confirm: bool,
}

pub(crate) fn service(state: &AppState) -> BilanService<BilanRepository> {
    BilanService::new(Arc::new(BilanRepository::new((*state.db).clone())))
}

/// GET /bilans/current - The open ledger, or `null`.
async fn current_bilan(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Option<Bilan>>> {
    Ok(Json(service(&state).current(&auth.session()).await?))
}

/// GET /bilans/available-years
async fn available_years(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<AvailableYearsResponse>> {
    let current_year = current_year();
    let years = service(&state)
        .available_years(&auth.session(), current_year)
        .await?;
    Ok(Json(AvailableYearsResponse {
        current_year,
        years,
    }))
}

/// GET /bilans/{bilan_id}/coverage - What blocks or warns before finalizing.
async fn coverage(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(bilan_id): Path<BilanId>,
) -> ApiResult<Json<Coverage>> {
    Ok(Json(
        service(&state).coverage(&auth.session(), bilan_id).await?,
    ))
}

/// POST /bilans/{bilan_id}/finalize?confirm=true
///
/// Missing mandatory attachments fail with 422. Properties without entries
/// return `confirmation_required` unless `confirm` is set.
async fn finalize(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(bilan_id): Path<BilanId>,
    Query(query): Query<FinalizeQuery>,
) -> ApiResult<Json<FinalizeOutcome>> {
    let session = auth.session();
    let outcome = service(&state)
        .finalize(&session, bilan_id, query.confirm, Utc::now())
        .await?;

    if let FinalizeOutcome::Finalized { bilan } = &outcome {
        record_finalized(&state, &session, bilan);
    }
    Ok(Json(outcome))
}

/// Moves the owner's wizard to the "just finalized" notice.
fn record_finalized(state: &AppState, session: &Session, bilan: &Bilan) {
    let next = state
        .wizards
        .get(&session.user_id)
        .map(|w| w.clone())
        .and_then(|w| w.ledger_finalized().ok())
        .unwrap_or(WizardState::LedgerFinalized {
            bilan_id: bilan.id,
            year: bilan.year,
        });
    state.wizards.insert(session.user_id, next);
}
