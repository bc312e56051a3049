// Per-employee permission document endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    models::employee_permissions::{
        CheckPermissionResponse, EmployeePermissionPath, EmployeePermissionsResponse,
        SavePermissionsRequest,
    },
    services::employee_permissions::EmployeePermissionService,
    utils::service_error::ServiceError,
};

/// Create the default document for a new employee
/// POST /v1/employees/{id}/permissions
#[utoipa::path(
    post,
    path = "/v1/employees/{id}/permissions",
    tag = "Employees",
    operation_id = "createEmployeePermissions",
    params(
        ("id" = Uuid, Path, description = "Employee ID (UUID)")
    ),
    responses(
        (status = 201, description = "Default document created", body = EmployeePermissionsResponse),
        (status = 409, description = "Document already exists")
    )
)]
pub async fn create_permissions(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let service = EmployeePermissionService::from_state(&state);
    let permissions = service.create_for_employee(employee_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(EmployeePermissionsResponse {
            employee_id,
            permissions,
        }),
    ))
}

/// Stored document merged against the current registry
/// GET /v1/employees/{id}/permissions
#[utoipa::path(
    get,
    path = "/v1/employees/{id}/permissions",
    tag = "Employees",
    operation_id = "getEmployeePermissions",
    params(
        ("id" = Uuid, Path, description = "Employee ID (UUID)")
    ),
    responses(
        (status = 200, description = "Complete permission document", body = EmployeePermissionsResponse),
        (status = 404, description = "No document for this employee")
    )
)]
pub async fn get_permissions(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> Result<Json<EmployeePermissionsResponse>, ServiceError> {
    let service = EmployeePermissionService::from_state(&state);
    let permissions = service.load(employee_id).await?;

    Ok(Json(EmployeePermissionsResponse {
        employee_id,
        permissions,
    }))
}

/// Save the full document submitted by the form
/// PUT /v1/employees/{id}/permissions
#[utoipa::path(
    put,
    path = "/v1/employees/{id}/permissions",
    tag = "Employees",
    operation_id = "saveEmployeePermissions",
    params(
        ("id" = Uuid, Path, description = "Employee ID (UUID)")
    ),
    request_body = SavePermissionsRequest,
    responses(
        (status = 200, description = "Document saved", body = EmployeePermissionsResponse),
        (status = 422, description = "Document is not a map of booleans")
    )
)]
pub async fn save_permissions(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
    Json(request): Json<SavePermissionsRequest>,
) -> Result<Json<EmployeePermissionsResponse>, ServiceError> {
    let service = EmployeePermissionService::from_state(&state);
    let permissions = service.save(employee_id, request.permissions).await?;

    Ok(Json(EmployeePermissionsResponse {
        employee_id,
        permissions,
    }))
}

/// DELETE /v1/employees/{id}/permissions
#[utoipa::path(
    delete,
    path = "/v1/employees/{id}/permissions",
    tag = "Employees",
    operation_id = "deleteEmployeePermissions",
    params(
        ("id" = Uuid, Path, description = "Employee ID (UUID)")
    ),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 404, description = "No document for this employee")
    )
)]
pub async fn delete_permissions(
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    EmployeePermissionService::from_state(&state)
        .delete(employee_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Whether the employee may perform an action
/// GET /v1/employees/{id}/permissions/{module}/{action}
#[utoipa::path(
    get,
    path = "/v1/employees/{id}/permissions/{module}/{action}",
    tag = "Employees",
    operation_id = "checkEmployeePermission",
    params(
        ("id" = Uuid, Path, description = "Employee ID (UUID)"),
        ("module" = String, Path, description = "Module key", example = "orders"),
        ("action" = String, Path, description = "Action key", example = "change_status_delivered")
    ),
    responses(
        (status = 200, description = "Evaluation result", body = CheckPermissionResponse),
        (status = 400, description = "Bad request - validation failed")
    )
)]
pub async fn check_permission(
    State(state): State<AppState>,
    Path(path): Path<EmployeePermissionPath>,
) -> Result<Json<CheckPermissionResponse>, ServiceError> {
    path.validate()?;

    let allowed = EmployeePermissionService::from_state(&state)
        .check(path.id, &path.module, &path.action)
        .await?;

    Ok(Json(CheckPermissionResponse {
        module: path.module,
        action: path.action,
        allowed,
    }))
}
