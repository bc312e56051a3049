// Configuration modules for the storefront permissions service

pub mod permissions;

pub use permissions::PermissionConfig;
