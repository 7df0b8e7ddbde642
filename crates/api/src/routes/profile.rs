//! Owner profile routes.

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use immoloc_core::profile::{Profile, ProfileDetails, ProfileService};
use immoloc_db::ProfileRepository;
use tracing::info;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// Creates the profile routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

fn service(state: &AppState) -> ProfileService<ProfileRepository> {
    ProfileService::new(Arc::new(ProfileRepository::new((*state.db).clone())))
}

/// GET /profile
async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Profile>> {
    Ok(Json(service(&state).get(&auth.session()).await?))
}

/// PUT /profile - Save the profile; the first missing required field is reported.
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(details): Json<ProfileDetails>,
) -> ApiResult<Json<Profile>> {
    let session = auth.session();
    let profile = service(&state).update(&session, details).await?;
    info!(user_id = %session.user_id, "Profile updated");
    Ok(Json(profile))
}
