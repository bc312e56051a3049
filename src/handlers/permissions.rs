// Registry, merge, check and form endpoints
// Stateless: they operate on documents supplied in the request body

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    app::AppState,
    models::{
        employee_permissions::{
            CheckPermissionRequest, CheckPermissionResponse, PermissionsResponse,
            RawPermissionsRequest, RenderFormRequest,
        },
        permission::PermissionModule,
    },
    services::{
        permission_engine::{generate_default_permissions, has_permission_value, merge_permissions},
        permission_form::{PermissionForm, PermissionFormView},
    },
    utils::service_error::ServiceError,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegistryResponse {
    pub modules: Vec<PermissionModule>,
    pub permission_count: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RenderFormResponse {
    pub form: PermissionFormView,
    #[schema(value_type = Object)]
    pub permissions: crate::models::permission::EmployeePermissions,
}

/// Permission registry
/// GET /v1/permissions/registry
#[utoipa::path(
    get,
    path = "/v1/permissions/registry",
    tag = "Permissions",
    operation_id = "getPermissionRegistry",
    responses(
        (status = 200, description = "All modules, subgroups and permissions", body = RegistryResponse)
    )
)]
pub async fn get_registry(State(state): State<AppState>) -> impl IntoResponse {
    Json(RegistryResponse {
        modules: state.registry.modules().to_vec(),
        permission_count: state.registry.permission_count(),
    })
}

/// Document with every permission at its default value
/// GET /v1/permissions/defaults
#[utoipa::path(
    get,
    path = "/v1/permissions/defaults",
    tag = "Permissions",
    operation_id = "getDefaultPermissions",
    responses(
        (status = 200, description = "Default permission document", body = PermissionsResponse)
    )
)]
pub async fn get_defaults(State(state): State<AppState>) -> impl IntoResponse {
    Json(PermissionsResponse {
        permissions: generate_default_permissions(&state.registry),
    })
}

/// Merge a stored, possibly stale document against the registry
/// POST /v1/permissions/merge
#[utoipa::path(
    post,
    path = "/v1/permissions/merge",
    tag = "Permissions",
    operation_id = "mergePermissions",
    request_body = RawPermissionsRequest,
    responses(
        (status = 200, description = "Complete permission document", body = PermissionsResponse)
    )
)]
pub async fn merge(
    State(state): State<AppState>,
    Json(request): Json<RawPermissionsRequest>,
) -> impl IntoResponse {
    Json(PermissionsResponse {
        permissions: merge_permissions(&state.registry, request.permissions.as_ref()),
    })
}

/// Evaluate one module/action pair against a supplied document
/// POST /v1/permissions/check
#[utoipa::path(
    post,
    path = "/v1/permissions/check",
    tag = "Permissions",
    operation_id = "checkPermission",
    request_body = CheckPermissionRequest,
    responses(
        (status = 200, description = "Evaluation result", body = CheckPermissionResponse),
        (status = 400, description = "Bad request - validation failed")
    )
)]
pub async fn check(
    Json(request): Json<CheckPermissionRequest>,
) -> Result<Json<CheckPermissionResponse>, ServiceError> {
    request.validate()?;

    let allowed = has_permission_value(request.permissions.as_ref(), &request.module, &request.action);
    debug!(module = %request.module, action = %request.action, allowed, "Evaluated permission");

    Ok(Json(CheckPermissionResponse {
        module: request.module,
        action: request.action,
        allowed,
    }))
}

/// Render the permission form, applying pending changes first
/// POST /v1/permissions/form
#[utoipa::path(
    post,
    path = "/v1/permissions/form",
    tag = "Permissions",
    operation_id = "renderPermissionForm",
    request_body = RenderFormRequest,
    responses(
        (status = 200, description = "Rendered form and resulting document", body = RenderFormResponse),
        (status = 400, description = "Unknown module or permission"),
        (status = 422, description = "A change targeted a disabled permission")
    )
)]
pub async fn render_form(
    State(state): State<AppState>,
    Json(request): Json<RenderFormRequest>,
) -> Result<Json<RenderFormResponse>, ServiceError> {
    request.validate()?;

    let mut form = PermissionForm::new(state.registry.clone(), request.permissions.as_ref());
    for change in &request.changes {
        form.on_permission_change(&change.module, &change.action, change.value)?;
    }

    let view = form.render();
    Ok(Json(RenderFormResponse {
        form: view,
        permissions: form.submit(),
    }))
}
