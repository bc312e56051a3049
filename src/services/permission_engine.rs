// Default generation, merge and evaluation over employee permission documents

use serde_json::Value;
use std::collections::BTreeMap;

use crate::models::permission::{EmployeePermissions, PermissionRegistry};

/// Build a document holding every registry key at its default value.
///
/// Subgroup permissions are stored flat under their owning module, so the
/// result only ever has two levels: module key, then action key.
pub fn generate_default_permissions(registry: &PermissionRegistry) -> EmployeePermissions {
    let mut document = EmployeePermissions::new();

    for module in registry.modules() {
        let actions: BTreeMap<String, bool> = module
            .all_permissions()
            .map(|item| (item.key.clone(), item.effective_default()))
            .collect();
        document.insert_module(module.key.clone(), actions);
    }

    document
}

/// Merge a raw stored document against the current registry.
///
/// Registry defaults form the base layer and stored values override them key
/// by key. Modules and actions the registry does not declare are dropped. A
/// stored value that is not a JSON boolean resolves to `false`, the same
/// answer the evaluation gate would give for it.
pub fn merge_permissions(
    registry: &PermissionRegistry,
    existing: Option<&Value>,
) -> EmployeePermissions {
    let mut merged = generate_default_permissions(registry);

    let stored_modules = match existing.and_then(Value::as_object) {
        Some(modules) => modules,
        None => return merged,
    };

    for module in registry.modules() {
        let stored_actions = match stored_modules.get(&module.key).and_then(Value::as_object) {
            Some(actions) => actions,
            None => continue,
        };

        for item in module.all_permissions() {
            if let Some(value) = stored_actions.get(&item.key) {
                merged.set(&module.key, &item.key, value.as_bool().unwrap_or(false));
            }
        }
    }

    merged
}

/// Typed counterpart of [`merge_permissions`]
pub fn merge_document(
    registry: &PermissionRegistry,
    existing: Option<&EmployeePermissions>,
) -> EmployeePermissions {
    let mut merged = generate_default_permissions(registry);

    if let Some(existing) = existing {
        for module in registry.modules() {
            for item in module.all_permissions() {
                if let Some(value) = existing.get(&module.key, &item.key) {
                    merged.set(&module.key, &item.key, value);
                }
            }
        }
    }

    merged
}

/// Fail-closed authorization gate.
///
/// Only a stored `true` grants access; a missing document, module or action
/// denies. `depends_on` is not consulted.
pub fn has_permission(
    document: Option<&EmployeePermissions>,
    module_key: &str,
    action_key: &str,
) -> bool {
    document
        .and_then(|d| d.get(module_key, action_key))
        .unwrap_or(false)
}

/// Gate over a raw JSON document; only the JSON literal `true` passes
pub fn has_permission_value(document: Option<&Value>, module_key: &str, action_key: &str) -> bool {
    matches!(
        document
            .and_then(|d| d.get(module_key))
            .and_then(|m| m.get(action_key)),
        Some(Value::Bool(true))
    )
}
