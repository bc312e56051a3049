// Middleware modules for the permissions service

pub mod cors;

pub use cors::cors_layer;
