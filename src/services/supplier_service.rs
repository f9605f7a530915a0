//! Supplier service - CRUD use cases over the supplier repository.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{Supplier, SupplierPayload};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Supplier service trait for dependency injection.
#[async_trait]
pub trait SupplierService: Send + Sync {
    /// List every supplier
    async fn list(&self) -> AppResult<Vec<Supplier>>;

    /// Get supplier by ID
    async fn get(&self, id: Uuid) -> AppResult<Supplier>;

    /// Insert a supplier, failing with `SaveFailed` when nothing was written
    async fn create(&self, supplier: Supplier) -> AppResult<Supplier>;

    /// Replace the supplier fields.
    ///
    /// The existence check uses `id`; the row written is the one matching
    /// the payload's own id (falling back to `id` when the payload has none).
    async fn update(&self, id: Uuid, payload: SupplierPayload) -> AppResult<()>;

    /// Delete supplier by ID, returning the removed record
    async fn delete(&self, id: Uuid) -> AppResult<Supplier>;
}

/// Concrete implementation of SupplierService using Unit of Work.
pub struct SupplierManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> SupplierManager<U> {
    /// Create new supplier service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> SupplierService for SupplierManager<U> {
    async fn list(&self) -> AppResult<Vec<Supplier>> {
        self.uow.suppliers().list().await
    }

    async fn get(&self, id: Uuid) -> AppResult<Supplier> {
        self.uow.suppliers().find_by_id(id).await?.ok_or_not_found()
    }

    async fn create(&self, supplier: Supplier) -> AppResult<Supplier> {
        let rows = self.uow.suppliers().insert(supplier.clone()).await?;
        if rows == 0 {
            tracing::warn!(supplier_id = %supplier.id, "Supplier insert affected no rows");
            return Err(AppError::SaveFailed);
        }

        tracing::info!(supplier_id = %supplier.id, "Supplier created");
        Ok(supplier)
    }

    async fn update(&self, id: Uuid, payload: SupplierPayload) -> AppResult<()> {
        let suppliers = self.uow.suppliers();
        suppliers.find_by_id(id).await?.ok_or_not_found()?;

        payload.validate()?;
        let supplier = payload.into_supplier(id);
        if supplier.id != id {
            tracing::warn!(path_id = %id, body_id = %supplier.id, "Supplier update body id differs from path id");
        }

        let target = supplier.id;
        if suppliers.update(supplier).await? == 0 {
            tracing::warn!(supplier_id = %target, "Supplier update affected no rows");
            return Err(AppError::SaveFailed);
        }

        tracing::info!(supplier_id = %target, "Supplier updated");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<Supplier> {
        let suppliers = self.uow.suppliers();
        let supplier = suppliers.find_by_id(id).await?.ok_or_not_found()?;

        if suppliers.delete(id).await? == 0 {
            return Err(AppError::SaveFailed);
        }

        tracing::info!(supplier_id = %id, "Supplier removed");
        Ok(supplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockSupplierRepository, MockUserRepository, Repositories};
    use mockall::predicate::eq;

    fn supplier(id: Uuid) -> Supplier {
        Supplier {
            id,
            name: "Acme".to_string(),
            document: "12345678901234".to_string(),
            active: true,
        }
    }

    fn payload(id: Option<Uuid>, name: &str) -> SupplierPayload {
        SupplierPayload {
            id,
            name: name.to_string(),
            document: "12345678901234".to_string(),
            active: false,
        }
    }

    fn service(repo: MockSupplierRepository) -> SupplierManager<Repositories> {
        let uow = Repositories::new(Arc::new(repo), Arc::new(MockUserRepository::new()));
        SupplierManager::new(Arc::new(uow))
    }

    #[tokio::test]
    async fn get_missing_supplier_is_not_found() {
        let mut repo = MockSupplierRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let err = service(repo).get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn create_with_zero_rows_is_save_failed() {
        let mut repo = MockSupplierRepository::new();
        repo.expect_insert().returning(|_| Ok(0));

        let err = service(repo).create(supplier(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, AppError::SaveFailed));
    }

    #[tokio::test]
    async fn update_checks_existence_before_validating() {
        let mut repo = MockSupplierRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_update().never();

        let err = service(repo)
            .update(Uuid::new_v4(), payload(None, ""))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn update_with_invalid_payload_changes_nothing() {
        let id = Uuid::new_v4();
        let mut repo = MockSupplierRepository::new();
        repo.expect_find_by_id().returning(|id| Ok(Some(supplier(id))));
        repo.expect_update().never();

        let err = service(repo).update(id, payload(None, "")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidModel(ref f) if f.contains_key("name")));
    }

    #[tokio::test]
    async fn update_writes_the_body_id() {
        let path_id = Uuid::new_v4();
        let body_id = Uuid::new_v4();

        let mut repo = MockSupplierRepository::new();
        repo.expect_find_by_id()
            .with(eq(path_id))
            .returning(|id| Ok(Some(supplier(id))));
        repo.expect_update()
            .withf(move |s| s.id == body_id && s.name == "Renamed")
            .times(1)
            .returning(|_| Ok(1));

        service(repo)
            .update(path_id, payload(Some(body_id), "Renamed"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_without_body_id_targets_path_id() {
        let path_id = Uuid::new_v4();

        let mut repo = MockSupplierRepository::new();
        repo.expect_find_by_id().returning(|id| Ok(Some(supplier(id))));
        repo.expect_update()
            .withf(move |s| s.id == path_id)
            .returning(|_| Ok(1));

        service(repo).update(path_id, payload(None, "Acme")).await.unwrap();
    }

    #[tokio::test]
    async fn update_with_zero_rows_is_save_failed() {
        let mut repo = MockSupplierRepository::new();
        repo.expect_find_by_id().returning(|id| Ok(Some(supplier(id))));
        repo.expect_update().returning(|_| Ok(0));

        let err = service(repo)
            .update(Uuid::new_v4(), payload(Some(Uuid::new_v4()), "Acme"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SaveFailed));
    }

    #[tokio::test]
    async fn delete_returns_removed_record() {
        let id = Uuid::new_v4();
        let mut repo = MockSupplierRepository::new();
        repo.expect_find_by_id().returning(|id| Ok(Some(supplier(id))));
        repo.expect_delete().with(eq(id)).returning(|_| Ok(1));

        let removed = service(repo).delete(id).await.unwrap();
        assert_eq!(removed.id, id);
    }

    #[tokio::test]
    async fn delete_missing_supplier_is_not_found() {
        let mut repo = MockSupplierRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_delete().never();

        let err = service(repo).delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }
}
