//! Ledger intake wizard.
//!
//! Progress lives in `AppState::wizards`, one state per owner. Without an
//! entry the state is rebuilt from the stored open ledger.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use immoloc_core::Session;
use immoloc_core::bilan::{MoveAddress, WizardState, current_year, instructions};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::bilans;
use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// Creates the wizard routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wizard", get(get_wizard))
        .route("/wizard/start", post(start))
        .route("/wizard/answer", post(answer))
        .route("/wizard/back", post(back))
        .route("/wizard/cancel", post(cancel))
}

/// One answer given in the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WizardAction {
    /// Step 1: new property acquired this year?
    NewProperty {
        /// Answer.
        acquired: bool,
    },
    /// Step 1, after a yes: the property now exists.
    PropertyCreated,
    /// Step 1, after a yes: the property form was closed.
    CancelPropertyCreation,
    /// Step 2: new main residence, if the owner moved.
    Moved {
        /// Address, `None` when the owner did not move.
        #[serde(default)]
        new_address: Option<MoveAddress>,
    },
    /// Step 3: pick a year.
    SelectYear {
        /// Fiscal year.
        year: i32,
    },
    /// Step 3: continue.
    ConfirmYear,
    /// Step 4: the acknowledgement checkbox.
    Accept {
        /// Checked or not.
        accepted: bool,
    },
    /// Step 4: create the ledger.
    OpenLedger,
    /// Dismiss the "ledger finalized" notice.
    Acknowledge,
}

/// Wizard state as shown to the owner.
#[derive(Debug, Serialize)]
pub struct WizardView {
    /// Current state.
    #[serde(flatten)]
    pub state: WizardState,
    /// Step 1 to 4 inside the wizard.
    pub step_number: Option<u8>,
    /// Instructions to acknowledge, at step 4 only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<String>>,
}

impl From<WizardState> for WizardView {
    fn from(state: WizardState) -> Self {
        let instructions = match &state {
            WizardState::Instructions { year, .. } => Some(instructions(*year)),
            _ => None,
        };
        Self {
            step_number: state.step_number(),
            instructions,
            state,
        }
    }
}

/// Cached progress worth keeping. `NoLedger` is not: another tab may have
/// opened a ledger since, so it is rebuilt from the store.
fn cached_progress(cached: Option<WizardState>) -> Option<WizardState> {
    cached.filter(|wizard| *wizard != WizardState::NoLedger)
}

async fn load(state: &AppState, session: &Session) -> ApiResult<WizardState> {
    let cached = state
        .wizards
        .get(&session.user_id)
        .map(|wizard| wizard.clone());
    if let Some(wizard) = cached_progress(cached) {
        return Ok(wizard);
    }
    let open = bilans::service(state).current(session).await?;
    Ok(WizardState::from_open_ledger(open.as_ref()))
}

fn save(state: &AppState, session: &Session, wizard: WizardState) -> Json<WizardView> {
    state.wizards.insert(session.user_id, wizard.clone());
    Json(wizard.into())
}

/// GET /wizard
async fn get_wizard(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<WizardView>> {
    let session = auth.session();
    let wizard = load(&state, &session).await?;
    Ok(Json(wizard.into()))
}

/// POST /wizard/start
async fn start(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<WizardView>> {
    let session = auth.session();
    let wizard = load(&state, &session).await?.start()?;
    Ok(save(&state, &session, wizard))
}

/// POST /wizard/answer
async fn answer(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(action): Json<WizardAction>,
) -> ApiResult<Json<WizardView>> {
    let session = auth.session();
    let wizard = load(&state, &session).await?;

    let next = match action {
        WizardAction::NewProperty { acquired } => wizard.answer_new_property(acquired)?,
        WizardAction::PropertyCreated => wizard.property_created()?,
        WizardAction::CancelPropertyCreation => wizard.cancel_property_creation()?,
        WizardAction::Moved { new_address } => {
            // Years are only looked up when the transition can succeed.
            let years = if matches!(wizard, WizardState::Moved { .. }) {
                bilans::service(&state)
                    .available_years(&session, current_year())
                    .await?
            } else {
                Vec::new()
            };
            wizard.answer_moved(new_address, years)?
        }
        WizardAction::SelectYear { year } => wizard.select_year(year)?,
        WizardAction::ConfirmYear => wizard.confirm_year()?,
        WizardAction::Accept { accepted } => wizard.set_accepted(accepted)?,
        WizardAction::OpenLedger => {
            let year = wizard.year_to_open()?;
            let bilan = bilans::service(&state)
                .open(&session, year, current_year())
                .await?;
            info!(user_id = %session.user_id, bilan_id = %bilan.id, year, "Ledger opened from wizard");
            wizard.ledger_opened(&bilan)?
        }
        WizardAction::Acknowledge => wizard.acknowledge()?,
    };

    Ok(save(&state, &session, next))
}

/// POST /wizard/back - Drops what was collected at the step left.
async fn back(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<WizardView>> {
    let session = auth.session();
    let wizard = load(&state, &session).await?.back()?;
    Ok(save(&state, &session, wizard))
}

/// POST /wizard/cancel
async fn cancel(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<WizardView>> {
    let session = auth.session();
    let wizard = load(&state, &session).await?.cancel()?;
    Ok(save(&state, &session, wizard))
}
