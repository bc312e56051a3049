// Service error type shared by handlers
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::{permission_form::FormError, permission_store::StoreError};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found")]
    NotFound,

    #[error("Permission document already exists")]
    AlreadyExists,

    #[error("Unknown permission module: {0}")]
    UnknownModule(String),

    #[error("Unknown permission: {0}")]
    UnknownPermission(String),

    #[error("Permission disabled: {0}")]
    PermissionDisabled(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServiceError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            },
            ServiceError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::NotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
            ServiceError::AlreadyExists => (
                StatusCode::CONFLICT,
                "Permission document already exists".to_string(),
            ),
            ServiceError::UnknownModule(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::UnknownPermission(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::PermissionDisabled(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

// Conversion from various error types
impl From<StoreError> for ServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::AlreadyExists(_) => ServiceError::AlreadyExists,
            StoreError::Pool(msg) => ServiceError::DatabaseError(msg),
            StoreError::Database(diesel::result::Error::NotFound) => ServiceError::NotFound,
            StoreError::Database(e) => ServiceError::DatabaseError(e.to_string()),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(error: FormError) -> Self {
        match error {
            FormError::UnknownModule(_) => ServiceError::UnknownModule(error.to_string()),
            FormError::UnknownPermission { .. } => {
                ServiceError::UnknownPermission(error.to_string())
            },
            FormError::Disabled { .. } => ServiceError::PermissionDisabled(error.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(error: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(error.to_string())
    }
}
