//! Immoloc API Server
//!
//! Main entry point for the rental-property backend.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use immoloc_api::{AppState, create_router};
use immoloc_core::storage::{StorageConfig, StorageError, StorageService};
use immoloc_db::connect;
use immoloc_shared::config::StorageSettings;
use immoloc_shared::{AppConfig, JwtConfig, JwtService};

fn storage_service(settings: &StorageSettings) -> Result<StorageService, StorageError> {
    StorageService::from_config(StorageConfig::from_settings(settings)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "immoloc=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    let jwt_service = JwtService::new(JwtConfig::from(&config.jwt));

    // File routes answer 503 when storage cannot be set up; the rest still serves.
    let storage = match storage_service(&config.storage) {
        Ok(service) => {
            info!(provider = service.provider_name(), "Object storage configured");
            Some(service)
        }
        Err(e) => {
            warn!(error = %e, "Object storage disabled");
            None
        }
    };

    let app = create_router(AppState::new(db, jwt_service, storage));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
