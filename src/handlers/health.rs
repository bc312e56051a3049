// Health check handler

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{app::AppState, services::employee_permissions::EmployeePermissionService};

/// GET /v1/health
#[utoipa::path(
    get,
    path = "/v1/health",
    tag = "Health",
    operation_id = "healthCheck",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 503, description = "Permission store is unavailable")
    )
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let service = EmployeePermissionService::from_state(&state);
    let timestamp = chrono::Utc::now().to_rfc3339();

    let (healthy, store_health) = match service.health_check().await {
        Ok(()) => (
            true,
            serde_json::json!({
                "status": "healthy",
                "backend": service.backend(),
                "error": null
            }),
        ),
        Err(e) => {
            tracing::warn!("Permission store health check failed: {}", e);
            (
                false,
                serde_json::json!({
                    "status": "unhealthy",
                    "backend": service.backend(),
                    "error": e.to_string()
                }),
            )
        },
    };

    let response = serde_json::json!({
        "status": if healthy { "healthy" } else { "degraded" },
        "service": "storefront-permissions",
        "timestamp": timestamp,
        "components": {
            "permission_store": store_health,
            "registry": {
                "modules": state.registry.modules().len(),
                "permissions": state.registry.permission_count()
            }
        }
    });

    if healthy {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}
