pub mod employee_permissions;
pub mod permission;

// Re-export common types
pub use employee_permissions::*;
pub use permission::{
    EmployeePermissions, PermissionItem, PermissionModule, PermissionRegistry,
    PermissionSubgroup, RegistryError,
};
