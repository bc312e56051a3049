// Services module for the storefront permissions service
// Business logic layer: permission engine, form state, persistence

pub mod employee_permissions;
pub mod permission_engine;
pub mod permission_form;
pub mod permission_store;

// Re-export commonly used services
pub use employee_permissions::EmployeePermissionService;
pub use permission_engine::{
    generate_default_permissions, has_permission, has_permission_value, merge_document,
    merge_permissions,
};
pub use permission_form::{FormError, PermissionForm, PermissionFormView};
pub use permission_store::{
    DieselPermissionStore, InMemoryPermissionStore, PermissionStore, StoreError,
};
