use anyhow::Context;
use std::sync::Arc;
use storefront_permissions::{
    app_config::AppConfig,
    build_router,
    config::PermissionConfig,
    db::{create_diesel_pool, mask_connection_string, DieselDatabaseConfig},
    migrations::{self, MigrationConfig},
    AppState, DieselPermissionStore, InMemoryPermissionStore, PermissionStore,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        port = config.server.port,
        "Starting storefront permissions service on {} ({})",
        config.server.bind_address,
        config.environment()
    );

    let registry = PermissionConfig::storefront_registry();
    info!(
        "Loaded permission registry: {} modules, {} permissions",
        registry.modules().len(),
        registry.permission_count()
    );

    let permission_store: Arc<dyn PermissionStore> = match &config.database {
        Some(database) => {
            info!("Database URL: {}", mask_connection_string(&database.url));

            if migrations::should_run_migrations(&config) {
                if let Some(migration_config) = MigrationConfig::from_app_config(&config) {
                    info!("Running embedded migrations...");
                    migrations::run_all_migrations(migration_config)
                        .await
                        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
                }
            }

            let pool = create_diesel_pool(DieselDatabaseConfig::from(database))
                .await
                .map_err(|e| anyhow::anyhow!("Database initialization failed: {}", e))?;
            Arc::new(DieselPermissionStore::new(pool))
        },
        None => {
            warn!("DATABASE_URL not set; permission documents are kept in memory");
            Arc::new(InMemoryPermissionStore::new())
        },
    };

    let bind_address = config.server.bind_address.clone();
    let state = AppState::new(Arc::new(config), registry, permission_store);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    info!("Listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
