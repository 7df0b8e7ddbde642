//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod archives;
pub mod attachments;
pub mod auth;
pub mod bilans;
pub mod documents;
pub mod entries;
pub mod health;
pub mod profile;
pub mod properties;
pub mod upload;
pub mod wizard;

/// Creates the API router; everything but health and sign-in/up/refresh needs a session.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(profile::routes())
        .merge(properties::routes())
        .merge(documents::routes())
        .merge(wizard::routes())
        .merge(bilans::routes())
        .merge(entries::routes())
        .merge(attachments::routes())
        .merge(archives::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::public_routes())
        .merge(protected_routes)
}
