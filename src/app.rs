// Application state shared across handlers
use std::sync::Arc;

use crate::{
    app_config::AppConfig, models::permission::PermissionRegistry,
    services::permission_store::PermissionStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub registry: Arc<PermissionRegistry>,
    pub permission_store: Arc<dyn PermissionStore>,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        registry: Arc<PermissionRegistry>,
        permission_store: Arc<dyn PermissionStore>,
    ) -> Self {
        Self {
            config,
            registry,
            permission_store,
        }
    }
}
