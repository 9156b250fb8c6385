//! Equipment Registry Server
//!
//! Registers equipment items with QR lookup codes.

use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use equipment_registry::{
    api,
    config::{AppConfig, StorageBackend},
    repository::{EquipmentStore, MemoryEquipmentStore, PgEquipmentStore},
    services::Services,
    storage, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("equipment_registry={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Equipment Registry v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn EquipmentStore> = if config.storage.backend == StorageBackend::Memory {
        tracing::warn!("Using in-memory registry, records are lost on restart");
        Arc::new(MemoryEquipmentStore::new())
    } else {
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .connect(&config.database.url)
            .await?;
        tracing::info!("Connected to database");

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations completed");

        Arc::new(PgEquipmentStore::new(pool))
    };

    let photos = storage::from_config(&config.storage).await?;
    tracing::info!("Photo storage backend: {:?}", config.storage.backend);

    let services = Services::from_config(store, photos, &config)?;

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
