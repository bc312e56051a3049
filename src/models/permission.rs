// Permission registry model
// Modules group permission items; subgroups are a presentation-only grouping
// whose items live in the owning module's flat key space.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use utoipa::ToSchema;

lazy_static! {
    static ref PERMISSION_KEY_REGEX: Regex = Regex::new(r"^[a-z][a-z0-9_]*$").unwrap();
}

// =============================================================================
// REGISTRY ERRORS
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Invalid permission key '{0}'")]
    InvalidKey(String),

    #[error("Duplicate module key '{0}'")]
    DuplicateModule(String),

    #[error("Duplicate subgroup '{subgroup}' in module '{module}'")]
    DuplicateSubgroup { module: String, subgroup: String },

    #[error("Duplicate permission '{permission}' in module '{module}'")]
    DuplicatePermission { module: String, permission: String },

    #[error("Permission '{permission}' in module '{module}' depends on unknown permission '{dependency}'")]
    UnknownDependency {
        module: String,
        permission: String,
        dependency: String,
    },

    #[error("Permission '{permission}' in module '{module}' depends on itself")]
    SelfDependency { module: String, permission: String },
}

// =============================================================================
// REGISTRY TYPES
// =============================================================================

/// A single capability that can be granted to an employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "key": "change_status_delivered",
    "label": "Mark as delivered",
    "dependsOn": ["change_any_status"]
}))]
pub struct PermissionItem {
    pub key: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Keys in the same module that must be granted before this item is actionable
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<bool>,
}

impl PermissionItem {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            description: None,
            depends_on: Vec::new(),
            default_value: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_depends_on<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default(mut self, value: bool) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Value used when no stored grant exists
    pub fn effective_default(&self) -> bool {
        self.default_value.unwrap_or(false)
    }
}

/// Named sub-collection of permissions under a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSubgroup {
    pub key: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<PermissionItem>,
}

impl PermissionSubgroup {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            description: None,
            permissions: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn permission(mut self, item: PermissionItem) -> Self {
        self.permissions.push(item);
        self
    }
}

/// Named group of capabilities, e.g. "Orders" or "Products"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionModule {
    pub key: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<PermissionItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subgroups: Vec<PermissionSubgroup>,
}

impl PermissionModule {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            description: None,
            permissions: Vec::new(),
            subgroups: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn permission(mut self, item: PermissionItem) -> Self {
        self.permissions.push(item);
        self
    }

    pub fn subgroup(mut self, subgroup: PermissionSubgroup) -> Self {
        self.subgroups.push(subgroup);
        self
    }

    /// Direct permissions first, then each subgroup's permissions in order
    pub fn all_permissions(&self) -> impl Iterator<Item = &PermissionItem> {
        self.permissions
            .iter()
            .chain(self.subgroups.iter().flat_map(|s| s.permissions.iter()))
    }

    pub fn find_permission(&self, key: &str) -> Option<&PermissionItem> {
        self.all_permissions().find(|item| item.key == key)
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Unvalidated registry shape as it appears in JSON
#[derive(Debug, Deserialize)]
pub struct RegistryDefinition {
    pub modules: Vec<PermissionModule>,
}

/// Validated, immutable set of permission modules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RegistryDefinition")]
pub struct PermissionRegistry {
    modules: Vec<PermissionModule>,
}

impl TryFrom<RegistryDefinition> for PermissionRegistry {
    type Error = RegistryError;

    fn try_from(definition: RegistryDefinition) -> Result<Self, Self::Error> {
        PermissionRegistry::new(definition.modules)
    }
}

fn validate_key(key: &str) -> Result<(), RegistryError> {
    if PERMISSION_KEY_REGEX.is_match(key) {
        Ok(())
    } else {
        Err(RegistryError::InvalidKey(key.to_string()))
    }
}

impl PermissionRegistry {
    pub fn new(modules: Vec<PermissionModule>) -> Result<Self, RegistryError> {
        let mut module_keys = HashSet::new();

        for module in &modules {
            validate_key(&module.key)?;
            if !module_keys.insert(module.key.as_str()) {
                return Err(RegistryError::DuplicateModule(module.key.clone()));
            }

            let mut subgroup_keys = HashSet::new();
            for subgroup in &module.subgroups {
                validate_key(&subgroup.key)?;
                if !subgroup_keys.insert(subgroup.key.as_str()) {
                    return Err(RegistryError::DuplicateSubgroup {
                        module: module.key.clone(),
                        subgroup: subgroup.key.clone(),
                    });
                }
            }

            // Direct and subgroup permissions share one key space per module
            let mut permission_keys = HashSet::new();
            for item in module.all_permissions() {
                validate_key(&item.key)?;
                if !permission_keys.insert(item.key.as_str()) {
                    return Err(RegistryError::DuplicatePermission {
                        module: module.key.clone(),
                        permission: item.key.clone(),
                    });
                }
            }

            for item in module.all_permissions() {
                for dependency in &item.depends_on {
                    if dependency == &item.key {
                        return Err(RegistryError::SelfDependency {
                            module: module.key.clone(),
                            permission: item.key.clone(),
                        });
                    }
                    if !permission_keys.contains(dependency.as_str()) {
                        return Err(RegistryError::UnknownDependency {
                            module: module.key.clone(),
                            permission: item.key.clone(),
                            dependency: dependency.clone(),
                        });
                    }
                }
            }
        }

        Ok(Self { modules })
    }

    pub fn modules(&self) -> &[PermissionModule] {
        &self.modules
    }

    pub fn module(&self, key: &str) -> Option<&PermissionModule> {
        self.modules.iter().find(|m| m.key == key)
    }

    pub fn find_permission(&self, module_key: &str, action_key: &str) -> Option<&PermissionItem> {
        self.module(module_key)
            .and_then(|module| module.find_permission(action_key))
    }

    pub fn contains(&self, module_key: &str, action_key: &str) -> bool {
        self.find_permission(module_key, action_key).is_some()
    }

    pub fn permission_count(&self) -> usize {
        self.modules.iter().map(|m| m.all_permissions().count()).sum()
    }
}

// =============================================================================
// EMPLOYEE PERMISSION DOCUMENT
// =============================================================================

/// Per-employee grants: module key -> action key -> granted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeePermissions(BTreeMap<String, BTreeMap<String, bool>>);

impl EmployeePermissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, module_key: &str, action_key: &str) -> Option<bool> {
        self.0
            .get(module_key)
            .and_then(|actions| actions.get(action_key))
            .copied()
    }

    pub fn set(&mut self, module_key: &str, action_key: &str, value: bool) {
        self.0
            .entry(module_key.to_string())
            .or_default()
            .insert(action_key.to_string(), value);
    }

    pub fn module(&self, module_key: &str) -> Option<&BTreeMap<String, bool>> {
        self.0.get(module_key)
    }

    pub fn insert_module(&mut self, module_key: String, actions: BTreeMap<String, bool>) {
        self.0.insert(module_key, actions);
    }

    pub fn modules(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, bool>)> {
        self.0.iter().map(|(key, actions)| (key.as_str(), actions))
    }

    /// Raw JSON shape used for persistence
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(module, actions)| {
                    let actions: Map<String, Value> = actions
                        .iter()
                        .map(|(action, granted)| (action.clone(), Value::Bool(*granted)))
                        .collect();
                    (module.clone(), Value::Object(actions))
                })
                .collect(),
        )
    }
}

impl From<BTreeMap<String, BTreeMap<String, bool>>> for EmployeePermissions {
    fn from(map: BTreeMap<String, BTreeMap<String, bool>>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn orders_module() -> PermissionModule {
        PermissionModule::new("orders", "Orders")
            .permission(PermissionItem::new("view", "View orders").with_default(true))
            .subgroup(
                PermissionSubgroup::new("actions", "Actions")
                    .permission(PermissionItem::new("delete_order_items", "Delete items")),
            )
    }

    #[test]
    fn test_valid_registry() {
        let registry = PermissionRegistry::new(vec![orders_module()]).unwrap();
        assert_eq!(registry.modules().len(), 1);
        assert_eq!(registry.permission_count(), 2);
        assert!(registry.contains("orders", "delete_order_items"));
        assert!(!registry.contains("orders", "actions"));
        assert!(!registry.contains("products", "view"));
    }

    #[test]
    fn test_duplicate_module_rejected() {
        let result = PermissionRegistry::new(vec![orders_module(), orders_module()]);
        assert_eq!(
            result.unwrap_err(),
            RegistryError::DuplicateModule("orders".to_string())
        );
    }

    #[test]
    fn test_duplicate_key_across_subgroup_rejected() {
        let module = orders_module().subgroup(
            PermissionSubgroup::new("extra", "Extra")
                .permission(PermissionItem::new("view", "View again")),
        );
        let result = PermissionRegistry::new(vec![module]);
        assert!(matches!(
            result,
            Err(RegistryError::DuplicatePermission { ref permission, .. }) if permission == "view"
        ));
    }

    #[test]
    fn test_duplicate_subgroup_rejected() {
        let module = orders_module().subgroup(PermissionSubgroup::new("actions", "Again"));
        assert!(matches!(
            PermissionRegistry::new(vec![module]),
            Err(RegistryError::DuplicateSubgroup { .. })
        ));
    }

    #[test]
    fn test_dependency_must_exist_in_same_module() {
        let products = PermissionModule::new("products", "Products")
            .permission(PermissionItem::new("edit", "Edit").with_depends_on(["view"]));
        let result = PermissionRegistry::new(vec![orders_module(), products]);
        assert_eq!(
            result.unwrap_err(),
            RegistryError::UnknownDependency {
                module: "products".to_string(),
                permission: "edit".to_string(),
                dependency: "view".to_string(),
            }
        );
    }

    #[test]
    fn test_dependency_may_cross_subgroups() {
        let module = orders_module().subgroup(
            PermissionSubgroup::new("status_changes", "Status Changes").permission(
                PermissionItem::new("change_status_delivered", "Delivered")
                    .with_depends_on(["delete_order_items"]),
            ),
        );
        assert!(PermissionRegistry::new(vec![module]).is_ok());
    }

    #[test]
    fn test_self_dependency_rejected() {
        let module = PermissionModule::new("orders", "Orders")
            .permission(PermissionItem::new("view", "View").with_depends_on(["view"]));
        assert!(matches!(
            PermissionRegistry::new(vec![module]),
            Err(RegistryError::SelfDependency { .. })
        ));
    }

    #[test]
    fn test_invalid_keys_rejected() {
        for key in ["", "Orders", "9lives", "view-orders", "view orders"] {
            let module = PermissionModule::new("orders", "Orders")
                .permission(PermissionItem::new(key, "Broken"));
            assert_eq!(
                PermissionRegistry::new(vec![module]).unwrap_err(),
                RegistryError::InvalidKey(key.to_string()),
                "key {:?} should be rejected",
                key
            );
        }
    }

    #[test]
    fn test_registry_deserialize_validates() {
        let registry: PermissionRegistry = serde_json::from_value(json!({
            "modules": [{
                "key": "orders",
                "label": "Orders",
                "permissions": [{ "key": "view", "label": "View", "defaultValue": true }],
                "subgroups": [{
                    "key": "status_changes",
                    "label": "Status Changes",
                    "permissions": [{
                        "key": "change_status_delivered",
                        "label": "Delivered",
                        "dependsOn": ["view"]
                    }]
                }]
            }]
        }))
        .unwrap();
        let item = registry
            .find_permission("orders", "change_status_delivered")
            .unwrap();
        assert_eq!(item.depends_on, vec!["view".to_string()]);
        assert!(!item.effective_default());

        let broken = serde_json::from_value::<PermissionRegistry>(json!({
            "modules": [{
                "key": "orders",
                "label": "Orders",
                "permissions": [{ "key": "edit", "label": "Edit", "dependsOn": ["missing"] }]
            }]
        }));
        assert!(broken.is_err());
    }

    #[test]
    fn test_document_round_trip_shape() {
        let mut document = EmployeePermissions::new();
        document.set("orders", "view", true);
        document.set("orders", "edit", false);

        assert_eq!(
            document.to_value(),
            json!({ "orders": { "view": true, "edit": false } })
        );
        assert_eq!(serde_json::to_value(&document).unwrap(), document.to_value());
        assert_eq!(document.get("orders", "view"), Some(true));
        assert_eq!(document.get("orders", "missing"), None);
        assert_eq!(document.get("missing", "view"), None);
    }
}
