// Persistence for employee permission documents
// Documents are stored verbatim; merging against the registry happens on read.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::RunQueryDsl;
use serde_json::Value;
use std::collections::{hash_map::Entry, HashMap};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::db::{check_diesel_health, DieselPool};
use crate::models::employee_permissions::EmployeePermissionsRecord;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Permission document already exists for employee {0}")]
    AlreadyExists(Uuid),

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),
}

#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Raw stored document, if any
    async fn load(&self, employee_id: Uuid) -> Result<Option<Value>, StoreError>;

    /// Store a new document; fails if one already exists
    async fn insert(&self, employee_id: Uuid, document: Value) -> Result<(), StoreError>;

    /// Create or replace the document verbatim
    async fn save(&self, employee_id: Uuid, document: Value) -> Result<(), StoreError>;

    /// Returns whether a document was removed
    async fn delete(&self, employee_id: Uuid) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;

    fn backend(&self) -> &'static str;
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

#[derive(Debug, Default)]
pub struct InMemoryPermissionStore {
    documents: RwLock<HashMap<Uuid, Value>>,
}

impl InMemoryPermissionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PermissionStore for InMemoryPermissionStore {
    async fn load(&self, employee_id: Uuid) -> Result<Option<Value>, StoreError> {
        Ok(self.documents.read().await.get(&employee_id).cloned())
    }

    async fn insert(&self, employee_id: Uuid, document: Value) -> Result<(), StoreError> {
        match self.documents.write().await.entry(employee_id) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(employee_id)),
            Entry::Vacant(slot) => {
                slot.insert(document);
                Ok(())
            },
        }
    }

    async fn save(&self, employee_id: Uuid, document: Value) -> Result<(), StoreError> {
        self.documents.write().await.insert(employee_id, document);
        Ok(())
    }

    async fn delete(&self, employee_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.documents.write().await.remove(&employee_id).is_some())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

// =============================================================================
// POSTGRES STORE
// =============================================================================

#[derive(Clone)]
pub struct DieselPermissionStore {
    pool: DieselPool,
}

impl DieselPermissionStore {
    pub fn new(pool: DieselPool) -> Self {
        Self { pool }
    }

    async fn connection(
        &self,
    ) -> Result<
        bb8::PooledConnection<
            '_,
            diesel_async::pooled_connection::AsyncDieselConnectionManager<
                diesel_async::AsyncPgConnection,
            >,
        >,
        StoreError,
    > {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::Pool(e.to_string()))
    }
}

#[async_trait]
impl PermissionStore for DieselPermissionStore {
    async fn load(&self, employee_id: Uuid) -> Result<Option<Value>, StoreError> {
        use crate::schema::employee_permissions::dsl;

        let mut conn = self.connection().await?;
        let record = dsl::employee_permissions
            .find(employee_id)
            .select(EmployeePermissionsRecord::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(record.map(|r| r.permissions))
    }

    async fn insert(&self, employee_id: Uuid, document: Value) -> Result<(), StoreError> {
        use crate::schema::employee_permissions::dsl;

        let mut conn = self.connection().await?;
        let record = EmployeePermissionsRecord::new(employee_id, document);

        match diesel::insert_into(dsl::employee_permissions)
            .values(&record)
            .execute(&mut conn)
            .await
        {
            Ok(_) => Ok(()),
            Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(StoreError::AlreadyExists(employee_id))
            },
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, employee_id: Uuid, document: Value) -> Result<(), StoreError> {
        use crate::schema::employee_permissions::dsl;

        let mut conn = self.connection().await?;
        let record = EmployeePermissionsRecord::new(employee_id, document);

        diesel::insert_into(dsl::employee_permissions)
            .values(&record)
            .on_conflict(dsl::employee_id)
            .do_update()
            .set((
                dsl::permissions.eq(record.permissions.clone()),
                dsl::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .await?;

        debug!(%employee_id, "Saved permission document");
        Ok(())
    }

    async fn delete(&self, employee_id: Uuid) -> Result<bool, StoreError> {
        use crate::schema::employee_permissions::dsl;

        let mut conn = self.connection().await?;
        let rows_affected = diesel::delete(dsl::employee_permissions.find(employee_id))
            .execute(&mut conn)
            .await?;

        Ok(rows_affected > 0)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        check_diesel_health(&self.pool)
            .await
            .map_err(|e| StoreError::Pool(e.to_string()))
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemoryPermissionStore, PermissionStore, StoreError};
    use uuid::Uuid;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_store_lifecycle() {
        let store = InMemoryPermissionStore::new();
        let employee_id = Uuid::new_v4();

        assert_eq!(store.load(employee_id).await.unwrap(), None);

        store
            .insert(employee_id, json!({ "orders": { "view": true } }))
            .await
            .unwrap();
        assert!(matches!(
            store.insert(employee_id, json!({})).await,
            Err(StoreError::AlreadyExists(id)) if id == employee_id
        ));

        store
            .save(employee_id, json!({ "orders": { "view": false } }))
            .await
            .unwrap();
        assert_eq!(
            store.load(employee_id).await.unwrap(),
            Some(json!({ "orders": { "view": false } }))
        );

        assert!(store.delete(employee_id).await.unwrap());
        assert!(!store.delete(employee_id).await.unwrap());
        assert_eq!(store.load(employee_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_keeps_documents_verbatim() {
        let store = InMemoryPermissionStore::new();
        let employee_id = Uuid::new_v4();
        let document = json!({ "orders": { "view": "yes", "legacy": true } });

        store.save(employee_id, document.clone()).await.unwrap();
        assert_eq!(store.load(employee_id).await.unwrap(), Some(document));
        assert_eq!(store.backend(), "memory");
    }
}
