//! Studio Server - photography studio site back-office

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studio_server::{
    api,
    backend::{MemoryTables, PgTables, TableClient},
    config::{AppConfig, BackendKind, StorageKind},
    repository::Repository,
    services::Services,
    storage::{LocalStorage, MemoryStorage, ObjectStorage, SupabaseStorage},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("studio_server={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }

    tracing::info!("Starting Studio Server v{}", env!("CARGO_PKG_VERSION"));

    let tables: Arc<dyn TableClient> = match config.backend.kind {
        BackendKind::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .connect(&config.database.url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations completed");

            Arc::new(PgTables::new(pool))
        }
        BackendKind::Memory => {
            tracing::warn!("Using in-memory tables; data is lost on restart");
            Arc::new(MemoryTables::new())
        }
    };

    let storage: Arc<dyn ObjectStorage> = match config.storage.kind {
        StorageKind::Local => Arc::new(LocalStorage::new(
            &config.storage.local_root,
            &config.storage.public_base_url,
        )),
        StorageKind::Supabase => {
            let url = config
                .storage
                .supabase_url
                .clone()
                .context("storage.supabase_url is required for supabase storage")?;
            let key = config
                .storage
                .supabase_service_key
                .clone()
                .context("storage.supabase_service_key is required for supabase storage")?;
            Arc::new(SupabaseStorage::new(url, key))
        }
        StorageKind::Memory => Arc::new(MemoryStorage::new(&config.storage.public_base_url)),
    };

    let repository = Repository::new(tables);
    let services = Services::new(repository, storage, &config);

    if let Some(admin) = services.auth.ensure_admin().await? {
        tracing::info!("Bootstrap admin account ready: {}", admin.email);
    }

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

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
