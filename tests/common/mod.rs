// Common test utilities shared across integration tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use storefront_permissions::{
    app::AppState, app_config::AppConfig, build_router, config::PermissionConfig,
    InMemoryPermissionStore, PermissionRegistry,
};
use tower::util::ServiceExt;

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub registry: Arc<PermissionRegistry>,
    pub store: Arc<InMemoryPermissionStore>,
}

impl TestApp {
    pub fn get(&self, uri: &str) -> TestRequest<'_> {
        TestRequest::new(self, "GET", uri)
    }

    pub fn post(&self, uri: &str) -> TestRequest<'_> {
        TestRequest::new(self, "POST", uri)
    }

    pub fn put(&self, uri: &str) -> TestRequest<'_> {
        TestRequest::new(self, "PUT", uri)
    }

    pub fn delete(&self, uri: &str) -> TestRequest<'_> {
        TestRequest::new(self, "DELETE", uri)
    }
}

/// Test request builder
pub struct TestRequest<'a> {
    app: &'a TestApp,
    request: Request<Body>,
}

impl<'a> TestRequest<'a> {
    fn new(app: &'a TestApp, method: &str, uri: &str) -> Self {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        Self { app, request }
    }

    /// Add JSON body to request
    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        let body_bytes = serde_json::to_vec(body).unwrap();
        self.request = Request::builder()
            .method(self.request.method().clone())
            .uri(self.request.uri().clone())
            .header("content-type", "application/json")
            .body(Body::from(body_bytes))
            .unwrap();
        self
    }

    /// Send the request
    pub async fn send(self) -> TestResponse {
        let response = self.app.app.clone().oneshot(self.request).await.unwrap();
        TestResponse { response }
    }
}

/// Test response wrapper
pub struct TestResponse {
    response: Response<Body>,
}

impl TestResponse {
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    /// Parse JSON response
    pub async fn json<T: serde::de::DeserializeOwned>(self) -> T {
        let body = axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }
}

/// Config for tests: no database, OpenAPI enabled
pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "ENVIRONMENT" => Some("test".to_string()),
        _ => None,
    })
    .unwrap()
}

/// Setup test application backed by the in-memory store
pub fn setup_test_app() -> TestApp {
    let registry = PermissionConfig::storefront_registry();
    let store = Arc::new(InMemoryPermissionStore::new());

    let state = AppState::new(Arc::new(test_config()), registry.clone(), store.clone());

    TestApp {
        app: build_router(state),
        registry,
        store,
    }
}
