// Utility modules for the storefront permissions service

pub mod service_error;

pub use service_error::ServiceError;
