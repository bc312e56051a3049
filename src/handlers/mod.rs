// HTTP handlers for the permissions service

pub mod docs;
pub mod employees;
pub mod health;
pub mod permissions;

use crate::app::AppState;
use axum::{
    routing::{get, post},
    Router,
};

// Registry and stateless document routes
pub fn permission_routes() -> Router<AppState> {
    Router::new()
        .route("/registry", get(permissions::get_registry))
        .route("/defaults", get(permissions::get_defaults))
        .route("/merge", post(permissions::merge))
        .route("/check", post(permissions::check))
        .route("/form", post(permissions::render_form))
}

// Per-employee document routes
pub fn employee_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/permissions",
            post(employees::create_permissions)
                .get(employees::get_permissions)
                .put(employees::save_permissions)
                .delete(employees::delete_permissions),
        )
        .route(
            "/{id}/permissions/{module}/{action}",
            get(employees::check_permission),
        )
}
