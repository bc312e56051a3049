use axum::http::{header, HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::app_config::AppConfig;

/// CORS policy for the dashboard frontends.
///
/// A `*` entry mirrors the request origin outside production; production only
/// admits the listed origins.
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let has_wildcard = config.cors_allowed_origins.iter().any(|o| o == "*");

    let allow_origin = if has_wildcard && !config.is_production() {
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter(|o| o.as_str() != "*")
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("CORS: Ignoring invalid origin {:?}", origin);
                    None
                },
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
        ])
        .max_age(Duration::from_secs(3600))
}
