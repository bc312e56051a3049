// HTTP API tests against the in-memory permission store

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use storefront_permissions::PermissionStore;
use uuid::Uuid;

use common::setup_test_app;

#[tokio::test]
async fn test_registry_endpoint() {
    let app = setup_test_app();

    let response = app.get("/v1/permissions/registry").send().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await;
    let modules = body["modules"].as_array().unwrap();
    assert_eq!(modules.len(), app.registry.modules().len());
    assert_eq!(modules[0]["key"], "dashboard");
    assert_eq!(
        body["permission_count"].as_u64().unwrap() as usize,
        app.registry.permission_count()
    );

    let orders = modules.iter().find(|m| m["key"] == "orders").unwrap();
    let status_changes = orders["subgroups"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["key"] == "status_changes")
        .unwrap();
    let delivered = status_changes["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["key"] == "change_status_delivered")
        .unwrap();
    assert_eq!(delivered["dependsOn"], json!(["change_any_status"]));
}

#[tokio::test]
async fn test_defaults_endpoint() {
    let app = setup_test_app();

    let response = app.get("/v1/permissions/defaults").send().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await;
    assert_eq!(body["permissions"]["orders"]["view"], true);
    assert_eq!(body["permissions"]["orders"]["change_status_delivered"], false);
    assert_eq!(body["permissions"]["products"]["manage_variants"], false);
    assert!(body["permissions"].get("status_changes").is_none());
}

#[tokio::test]
async fn test_merge_endpoint() {
    let app = setup_test_app();

    let response = app
        .post("/v1/permissions/merge")
        .json(&json!({
            "permissions": {
                "orders": { "view": false, "legacy_flag": true },
                "retired": { "view": true }
            }
        }))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await;
    assert_eq!(body["permissions"]["orders"]["view"], false);
    assert_eq!(body["permissions"]["orders"]["refund"], false);
    assert!(body["permissions"]["orders"].get("legacy_flag").is_none());
    assert!(body["permissions"].get("retired").is_none());

    let response = app
        .post("/v1/permissions/merge")
        .json(&json!({ "permissions": null }))
        .send()
        .await;
    let merged_null: Value = response.json().await;
    let defaults: Value = app.get("/v1/permissions/defaults").send().await.json().await;
    assert_eq!(merged_null, defaults);
}

#[tokio::test]
async fn test_check_endpoint() {
    let app = setup_test_app();

    let cases = [
        (json!(null), false),
        (json!({}), false),
        (json!({ "orders": { "view": true } }), true),
        (json!({ "orders": { "view": "yes" } }), false),
    ];

    for (permissions, expected) in cases {
        let response = app
            .post("/v1/permissions/check")
            .json(&json!({ "permissions": permissions, "module": "orders", "action": "view" }))
            .send()
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await;
        assert_eq!(body["allowed"], expected, "permissions: {}", permissions);
    }

    let response = app
        .post("/v1/permissions/check")
        .json(&json!({ "permissions": {}, "module": "", "action": "view" }))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_form_endpoint_applies_changes() {
    let app = setup_test_app();

    let response = app
        .post("/v1/permissions/form")
        .json(&json!({
            "permissions": { "orders": { "view": true } },
            "changes": [
                { "module": "orders", "action": "change_any_status", "value": true },
                { "module": "orders", "action": "change_status_delivered", "value": true },
                { "module": "orders", "action": "change_any_status", "value": false }
            ]
        }))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await;
    assert_eq!(body["permissions"]["orders"]["change_status_delivered"], true);
    assert_eq!(body["permissions"]["orders"]["change_any_status"], false);

    let orders = body["form"]["modules"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["key"] == "orders")
        .unwrap();
    let delivered = orders["sections"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|s| s["toggles"].as_array().unwrap().iter())
        .find(|t| t["key"] == "change_status_delivered")
        .unwrap();
    assert_eq!(delivered["checked"], true);
    assert_eq!(delivered["disabled"], true);
    assert_eq!(delivered["missingDependencies"], json!(["change_any_status"]));
}

#[tokio::test]
async fn test_form_endpoint_rejects_disabled_change() {
    let app = setup_test_app();

    let response = app
        .post("/v1/permissions/form")
        .json(&json!({
            "changes": [
                { "module": "orders", "action": "change_status_delivered", "value": true }
            ]
        }))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .post("/v1/permissions/form")
        .json(&json!({
            "changes": [{ "module": "loyalty", "action": "view", "value": true }]
        }))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_employee_document_lifecycle() {
    let app = setup_test_app();
    let employee_id = Uuid::new_v4();
    let uri = format!("/v1/employees/{}/permissions", employee_id);

    assert_eq!(app.get(&uri).send().await.status(), StatusCode::NOT_FOUND);

    let response = app.post(&uri).send().await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await;
    assert_eq!(created["employee_id"], employee_id.to_string());
    assert_eq!(created["permissions"]["orders"]["view"], true);

    assert_eq!(app.post(&uri).send().await.status(), StatusCode::CONFLICT);

    let response = app
        .put(&uri)
        .json(&json!({
            "permissions": {
                "orders": { "view": true, "change_any_status": true, "change_status_delivered": true }
            }
        }))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let loaded: Value = app.get(&uri).send().await.json().await;
    assert_eq!(loaded["permissions"]["orders"]["change_status_delivered"], true);
    assert_eq!(loaded["permissions"]["products"]["view"], true);

    let check: Value = app
        .get(&format!("{}/orders/change_status_delivered", uri))
        .send()
        .await
        .json()
        .await;
    assert_eq!(check["allowed"], true);

    assert_eq!(app.delete(&uri).send().await.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.delete(&uri).send().await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_save_rejects_non_boolean_values() {
    let app = setup_test_app();
    let uri = format!("/v1/employees/{}/permissions", Uuid::new_v4());

    let response = app
        .put(&uri)
        .json(&json!({ "permissions": { "orders": { "view": "yes" } } }))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_stale_stored_document_is_merged_on_read() {
    let app = setup_test_app();
    let employee_id = Uuid::new_v4();
    app.store
        .save(employee_id, json!({ "orders": { "view": false } }))
        .await
        .unwrap();

    let uri = format!("/v1/employees/{}/permissions", employee_id);
    let loaded: Value = app.get(&uri).send().await.json().await;
    assert_eq!(loaded["permissions"]["orders"]["view"], false);
    assert_eq!(loaded["permissions"]["orders"]["delete_order_items"], false);
    assert_eq!(loaded["permissions"]["dashboard"]["view"], true);
}

#[tokio::test]
async fn test_employee_check_fails_closed() {
    let app = setup_test_app();
    let employee_id = Uuid::new_v4();

    let check: Value = app
        .get(&format!("/v1/employees/{}/permissions/orders/view", employee_id))
        .send()
        .await
        .json()
        .await;
    assert_eq!(check["allowed"], false);

    app.post(&format!("/v1/employees/{}/permissions", employee_id))
        .send()
        .await;
    let check: Value = app
        .get(&format!(
            "/v1/employees/{}/permissions/orders/teleport",
            employee_id
        ))
        .send()
        .await
        .json()
        .await;
    assert_eq!(check["allowed"], false);
}

#[tokio::test]
async fn test_employee_check_validates_path_keys() {
    let app = setup_test_app();
    let employee_id = Uuid::new_v4();
    app.post(&format!("/v1/employees/{}/permissions", employee_id))
        .send()
        .await;

    let long_key = "a".repeat(65);
    let response = app
        .get(&format!(
            "/v1/employees/{}/permissions/{}/view",
            employee_id, long_key
        ))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .get(&format!(
            "/v1/employees/{}/permissions/orders/{}",
            employee_id, long_key
        ))
        .send()
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_employee_check_applies_registry_defaults() {
    let app = setup_test_app();
    let employee_id = Uuid::new_v4();

    // Stored document predates orders.view
    app.store
        .save(employee_id, json!({ "products": { "view": true } }))
        .await
        .unwrap();

    let check: Value = app
        .get(&format!("/v1/employees/{}/permissions/orders/view", employee_id))
        .send()
        .await
        .json()
        .await;
    assert_eq!(check["allowed"], true);

    // The stateless check evaluates the supplied document as-is
    let check: Value = app
        .post("/v1/permissions/check")
        .json(&json!({
            "permissions": { "products": { "view": true } },
            "module": "orders",
            "action": "view"
        }))
        .send()
        .await
        .json()
        .await;
    assert_eq!(check["allowed"], false);
}

#[tokio::test]
async fn test_health_and_openapi() {
    let app = setup_test_app();

    let response = app.get("/v1/health").send().await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["components"]["permission_store"]["backend"], "memory");

    let response = app.get("/v1/docs/openapi.json").send().await;
    assert_eq!(response.status(), StatusCode::OK);
    let document: Value = response.json().await;
    assert!(document["paths"]
        .get("/v1/employees/{id}/permissions")
        .is_some());
}
