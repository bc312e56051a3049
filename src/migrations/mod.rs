// Migration orchestrator for the permissions service
// Embedded in the application binary for distroless container compatibility

pub mod diesel;

use std::error::Error;
use tracing::{error, info};

use crate::app_config::AppConfig;

/// Configuration for migration execution
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    pub database_url: String,
    pub environment: String,
}

impl MigrationConfig {
    /// None when no database is configured
    pub fn from_app_config(config: &AppConfig) -> Option<Self> {
        config.database.as_ref().map(|database| Self {
            database_url: database.url.clone(),
            environment: config.environment().to_string(),
        })
    }
}

/// Run pending PostgreSQL migrations, returning how many were applied
pub async fn run_all_migrations(
    config: MigrationConfig,
) -> Result<usize, Box<dyn Error + Send + Sync>> {
    info!(
        "[MIGRATIONS] Starting migration process for environment: {}",
        config.environment
    );

    match diesel::run_migrations(config.database_url).await {
        Ok(applied_count) => {
            if applied_count > 0 {
                info!("[MIGRATIONS] ✓ Applied {} Diesel migrations", applied_count);
            } else {
                info!("[MIGRATIONS] ✓ Diesel migrations up to date");
            }
            Ok(applied_count)
        },
        Err(e) => {
            error!("[MIGRATIONS] ✗ Diesel migration failed: {}", e);
            Err(format!("Diesel migration failed: {}", e).into())
        },
    }
}

/// Check if migrations should run for this configuration
pub fn should_run_migrations(config: &AppConfig) -> bool {
    config.database.is_some() && !config.features.disable_embedded_migrations
}
