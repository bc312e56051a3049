// OpenAPI document generated from handler annotations

use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

use crate::handlers::{employees, health, permissions};
use crate::models::{
    employee_permissions::{
        CheckPermissionRequest, CheckPermissionResponse, EmployeePermissionsResponse,
        PermissionChange, PermissionsResponse, RawPermissionsRequest, RenderFormRequest,
        SavePermissionsRequest,
    },
    permission::{PermissionItem, PermissionModule, PermissionSubgroup},
};
use crate::services::permission_form::{
    FormSectionView, ModuleFormView, PermissionFormView, ToggleView,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront Permissions API",
        description = "Employee permission registry, documents and checks for the merchant dashboard"
    ),
    paths(
        permissions::get_registry,
        permissions::get_defaults,
        permissions::merge,
        permissions::check,
        permissions::render_form,
        employees::create_permissions,
        employees::get_permissions,
        employees::save_permissions,
        employees::delete_permissions,
        employees::check_permission,
        health::health_check,
    ),
    components(schemas(
        PermissionItem,
        PermissionSubgroup,
        PermissionModule,
        permissions::RegistryResponse,
        permissions::RenderFormResponse,
        RawPermissionsRequest,
        SavePermissionsRequest,
        CheckPermissionRequest,
        CheckPermissionResponse,
        PermissionChange,
        RenderFormRequest,
        PermissionsResponse,
        EmployeePermissionsResponse,
        PermissionFormView,
        ModuleFormView,
        FormSectionView,
        ToggleView,
    )),
    tags(
        (name = "Permissions", description = "Registry, defaults, merge and evaluation"),
        (name = "Employees", description = "Per-employee permission documents"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification at /v1/docs/openapi.json
pub async fn serve_openapi_spec() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
