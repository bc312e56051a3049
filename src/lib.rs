// Library exports for the storefront permissions service

pub mod app;
pub mod app_config;
pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod schema;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use app::AppState;
pub use app_config::{AppConfig, ConfigError};
pub use config::PermissionConfig;
pub use models::permission::{
    EmployeePermissions, PermissionItem, PermissionModule, PermissionRegistry,
    PermissionSubgroup, RegistryError,
};
pub use services::{
    generate_default_permissions, has_permission, has_permission_value, merge_permissions,
    DieselPermissionStore, EmployeePermissionService, FormError, InMemoryPermissionStore,
    PermissionForm, PermissionStore,
};
pub use utils::ServiceError;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// Assemble the full HTTP router
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .nest("/v1/permissions", handlers::permission_routes())
        .nest("/v1/employees", handlers::employee_routes())
        .route("/v1/health", get(handlers::health::health_check));

    if state.config.features.enable_openapi {
        router = router.route(
            "/v1/docs/openapi.json",
            get(handlers::docs::serve_openapi_spec),
        );
    }

    router
        .layer(middleware::cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
