// Stored permission document row

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::permission::EmployeePermissions;
use crate::schema::employee_permissions;

// =============================================================================
// DATABASE MODELS
// =============================================================================

/// Raw document as persisted; not merged against the registry
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = employee_permissions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EmployeePermissionsRecord {
    pub employee_id: Uuid,
    pub permissions: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmployeePermissionsRecord {
    pub fn new(employee_id: Uuid, permissions: Value) -> Self {
        let now = Utc::now();
        Self {
            employee_id,
            permissions,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// API TYPES
// =============================================================================

/// Body carrying a raw, possibly stale or partial, document
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RawPermissionsRequest {
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub permissions: Option<Value>,
}

/// Body for saving a full document
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SavePermissionsRequest {
    #[schema(value_type = Object)]
    pub permissions: EmployeePermissions,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CheckPermissionRequest {
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub permissions: Option<Value>,

    #[validate(length(min = 1, max = 64))]
    pub module: String,

    #[validate(length(min = 1, max = 64))]
    pub action: String,
}

/// Path of `GET /v1/employees/{id}/permissions/{module}/{action}`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmployeePermissionPath {
    pub id: Uuid,

    #[validate(length(min = 1, max = 64))]
    pub module: String,

    #[validate(length(min = 1, max = 64))]
    pub action: String,
}

/// One `onPermissionChange(module, action, value)` call
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PermissionChange {
    #[validate(length(min = 1, max = 64))]
    pub module: String,

    #[validate(length(min = 1, max = 64))]
    pub action: String,

    pub value: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct RenderFormRequest {
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub permissions: Option<Value>,

    /// Applied in order before rendering
    #[serde(default)]
    #[validate]
    pub changes: Vec<PermissionChange>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PermissionsResponse {
    #[schema(value_type = Object)]
    pub permissions: EmployeePermissions,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeePermissionsResponse {
    pub employee_id: Uuid,
    #[schema(value_type = Object)]
    pub permissions: EmployeePermissions,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckPermissionResponse {
    pub module: String,
    pub action: String,
    pub allowed: bool,
}
