// Dependency-aware permission form
// Holds the live edit state of one employee's document. A toggle is disabled
// while any of its prerequisites is off in that live state; dependents are
// never cleared when a prerequisite is switched off.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use utoipa::ToSchema;

use crate::models::permission::{
    EmployeePermissions, PermissionItem, PermissionModule, PermissionRegistry,
};
use crate::services::permission_engine::{has_permission, merge_document, merge_permissions};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown permission module '{0}'")]
    UnknownModule(String),

    #[error("Unknown permission '{action}' in module '{module}'")]
    UnknownPermission { module: String, action: String },

    #[error("Permission '{action}' in module '{module}' requires {}", .missing.join(", "))]
    Disabled {
        module: String,
        action: String,
        missing: Vec<String>,
    },
}

// =============================================================================
// VIEW MODELS
// =============================================================================

/// One toggle as the dashboard renders it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleView {
    pub key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub checked: bool,
    pub disabled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_dependencies: Vec<String>,
}

/// Direct permissions (no key) or one subgroup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormSectionView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub toggles: Vec<ToggleView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleFormView {
    pub key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sections: Vec<FormSectionView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PermissionFormView {
    pub modules: Vec<ModuleFormView>,
}

impl PermissionFormView {
    pub fn toggle(&self, module_key: &str, action_key: &str) -> Option<&ToggleView> {
        self.modules
            .iter()
            .find(|m| m.key == module_key)?
            .sections
            .iter()
            .flat_map(|s| s.toggles.iter())
            .find(|t| t.key == action_key)
    }
}

// =============================================================================
// FORM STATE
// =============================================================================

pub struct PermissionForm {
    registry: Arc<PermissionRegistry>,
    state: EmployeePermissions,
}

impl PermissionForm {
    /// Start editing from a raw stored document (or none)
    pub fn new(registry: Arc<PermissionRegistry>, stored: Option<&Value>) -> Self {
        let state = merge_permissions(&registry, stored);
        Self { registry, state }
    }

    pub fn from_document(registry: Arc<PermissionRegistry>, document: &EmployeePermissions) -> Self {
        let state = merge_document(&registry, Some(document));
        Self { registry, state }
    }

    pub fn state(&self) -> &EmployeePermissions {
        &self.state
    }

    fn lookup(&self, module_key: &str, action_key: &str) -> Result<&PermissionItem, FormError> {
        let module = self
            .registry
            .module(module_key)
            .ok_or_else(|| FormError::UnknownModule(module_key.to_string()))?;
        module
            .find_permission(action_key)
            .ok_or_else(|| FormError::UnknownPermission {
                module: module_key.to_string(),
                action: action_key.to_string(),
            })
    }

    fn unmet(&self, module_key: &str, item: &PermissionItem) -> Vec<String> {
        item.depends_on
            .iter()
            .filter(|dep| !has_permission(Some(&self.state), module_key, dep))
            .cloned()
            .collect()
    }

    /// Prerequisites of `action_key` that are currently off
    pub fn missing_dependencies(
        &self,
        module_key: &str,
        action_key: &str,
    ) -> Result<Vec<String>, FormError> {
        let item = self.lookup(module_key, action_key)?;
        Ok(self.unmet(module_key, item))
    }

    pub fn is_disabled(&self, module_key: &str, action_key: &str) -> Result<bool, FormError> {
        Ok(!self.missing_dependencies(module_key, action_key)?.is_empty())
    }

    /// Apply one change from the form; refused while the toggle is disabled
    pub fn on_permission_change(
        &mut self,
        module_key: &str,
        action_key: &str,
        value: bool,
    ) -> Result<(), FormError> {
        let missing = self.missing_dependencies(module_key, action_key)?;
        if !missing.is_empty() {
            debug!(
                module = module_key,
                action = action_key,
                "Rejected change on disabled permission toggle"
            );
            return Err(FormError::Disabled {
                module: module_key.to_string(),
                action: action_key.to_string(),
                missing,
            });
        }

        self.state.set(module_key, action_key, value);
        Ok(())
    }

    /// Flip an enabled toggle and return its new value
    pub fn toggle(&mut self, module_key: &str, action_key: &str) -> Result<bool, FormError> {
        let next = !has_permission(Some(&self.state), module_key, action_key);
        self.on_permission_change(module_key, action_key, next)?;
        Ok(next)
    }

    fn toggle_view(&self, module_key: &str, item: &PermissionItem) -> ToggleView {
        let missing_dependencies = self.unmet(module_key, item);
        ToggleView {
            key: item.key.clone(),
            label: item.label.clone(),
            description: item.description.clone(),
            checked: has_permission(Some(&self.state), module_key, &item.key),
            disabled: !missing_dependencies.is_empty(),
            depends_on: item.depends_on.clone(),
            missing_dependencies,
        }
    }

    fn module_view(&self, module: &PermissionModule) -> ModuleFormView {
        let mut sections = Vec::with_capacity(module.subgroups.len() + 1);

        if !module.permissions.is_empty() {
            sections.push(FormSectionView {
                key: None,
                label: None,
                toggles: module
                    .permissions
                    .iter()
                    .map(|item| self.toggle_view(&module.key, item))
                    .collect(),
            });
        }

        for subgroup in &module.subgroups {
            sections.push(FormSectionView {
                key: Some(subgroup.key.clone()),
                label: Some(subgroup.label.clone()),
                toggles: subgroup
                    .permissions
                    .iter()
                    .map(|item| self.toggle_view(&module.key, item))
                    .collect(),
            });
        }

        ModuleFormView {
            key: module.key.clone(),
            label: module.label.clone(),
            description: module.description.clone(),
            sections,
        }
    }

    /// Render every module against the current live state
    pub fn render(&self) -> PermissionFormView {
        PermissionFormView {
            modules: self
                .registry
                .modules()
                .iter()
                .map(|module| self.module_view(module))
                .collect(),
        }
    }

    /// Full document as submitted by the form
    pub fn submit(self) -> EmployeePermissions {
        self.state
    }
}
