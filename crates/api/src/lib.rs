//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - Authentication middleware bound to revocable sessions
//! - JSON error rendering for every domain error

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use dashmap::DashMap;
use immoloc_core::bilan::WizardState;
use immoloc_core::storage::StorageService;
use immoloc_shared::JwtService;
use immoloc_shared::types::UserId;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Object storage for documents and attachments (optional).
    pub storage: Option<Arc<StorageService>>,
    /// Ledger wizard progress per owner. Lost on restart.
    pub wizards: Arc<DashMap<UserId, WizardState>>,
}

impl AppState {
    /// Creates the state with an empty wizard table.
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        jwt_service: JwtService,
        storage: Option<StorageService>,
    ) -> Self {
        Self {
            db: Arc::new(db),
            jwt_service: Arc::new(jwt_service),
            storage: storage.map(Arc::new),
            wizards: Arc::new(DashMap::new()),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
