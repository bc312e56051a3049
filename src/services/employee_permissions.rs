// Employee permission documents: create, load, save, delete, check

use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    app::AppState,
    models::permission::{EmployeePermissions, PermissionRegistry},
    services::{
        permission_engine::{
            generate_default_permissions, has_permission, merge_document, merge_permissions,
        },
        permission_store::PermissionStore,
    },
    utils::service_error::ServiceError,
};

#[derive(Clone)]
pub struct EmployeePermissionService {
    registry: Arc<PermissionRegistry>,
    store: Arc<dyn PermissionStore>,
}

impl EmployeePermissionService {
    pub fn new(registry: Arc<PermissionRegistry>, store: Arc<dyn PermissionStore>) -> Self {
        Self { registry, store }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.registry.clone(), state.permission_store.clone())
    }

    /// Store an all-default document for a newly created employee
    #[instrument(skip(self))]
    pub async fn create_for_employee(
        &self,
        employee_id: Uuid,
    ) -> Result<EmployeePermissions, ServiceError> {
        let defaults = generate_default_permissions(&self.registry);
        self.store.insert(employee_id, defaults.to_value()).await?;

        info!("Created default permission document");
        Ok(defaults)
    }

    /// Stored document merged against the current registry
    #[instrument(skip(self))]
    pub async fn load(&self, employee_id: Uuid) -> Result<EmployeePermissions, ServiceError> {
        let stored = self
            .store
            .load(employee_id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        Ok(merge_permissions(&self.registry, Some(&stored)))
    }

    /// Persist a submitted document verbatim and return its merged view
    #[instrument(skip(self, document))]
    pub async fn save(
        &self,
        employee_id: Uuid,
        document: EmployeePermissions,
    ) -> Result<EmployeePermissions, ServiceError> {
        for (module_key, actions) in document.modules() {
            for action_key in actions.keys() {
                if !self.registry.contains(module_key, action_key) {
                    debug!(
                        module = module_key,
                        action = %action_key,
                        "Saving permission key not declared in the registry"
                    );
                }
            }
        }

        self.store.save(employee_id, document.to_value()).await?;
        info!("Saved permission document");

        Ok(merge_document(&self.registry, Some(&document)))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, employee_id: Uuid) -> Result<(), ServiceError> {
        if self.store.delete(employee_id).await? {
            info!("Deleted permission document");
            Ok(())
        } else {
            Err(ServiceError::NotFound)
        }
    }

    /// Gate check for one employee; a missing document denies.
    /// Unlike `POST /v1/permissions/check`, the stored document is merged first,
    /// so registry defaults apply to keys it does not carry.
    #[instrument(skip(self))]
    pub async fn check(
        &self,
        employee_id: Uuid,
        module_key: &str,
        action_key: &str,
    ) -> Result<bool, ServiceError> {
        let document = self
            .store
            .load(employee_id)
            .await?
            .map(|stored| merge_permissions(&self.registry, Some(&stored)));

        let allowed = has_permission(document.as_ref(), module_key, action_key);
        debug!(allowed, "Evaluated permission");
        Ok(allowed)
    }

    pub async fn health_check(&self) -> Result<(), ServiceError> {
        self.store.health_check().await.map_err(ServiceError::from)
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }
}
