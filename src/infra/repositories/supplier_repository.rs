//! Supplier repository backed by SeaORM.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::base::{DeleteRepository, ReadRepository};
use super::entities::supplier::{self, ActiveModel, Entity as SupplierEntity, Model as SupplierModel};
use crate::domain::Supplier;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Supplier repository trait for dependency injection.
///
/// Write operations report the number of rows affected so callers can
/// tell a no-op apart from a successful write.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SupplierRepository: Send + Sync {
    /// List every supplier
    async fn list(&self) -> AppResult<Vec<Supplier>>;

    /// Find supplier by primary key
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Supplier>>;

    /// Insert a supplier; an existing id is left untouched and yields 0
    async fn insert(&self, supplier: Supplier) -> AppResult<u64>;

    /// Replace name, document and active on the row matching `supplier.id`
    async fn update(&self, supplier: Supplier) -> AppResult<u64>;

    /// Delete supplier by primary key
    async fn delete(&self, id: Uuid) -> AppResult<u64>;
}

/// Concrete implementation of SupplierRepository
pub struct SupplierStore {
    db: DatabaseConnection,
}

impl SupplierStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ReadRepository<SupplierEntity, SupplierModel> for SupplierStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl DeleteRepository<SupplierEntity> for SupplierStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl SupplierRepository for SupplierStore {
    async fn list(&self) -> AppResult<Vec<Supplier>> {
        let models = ReadRepository::<SupplierEntity, SupplierModel>::find_all(self).await?;
        Ok(models.into_iter().map(Supplier::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Supplier>> {
        let model = ReadRepository::<SupplierEntity, SupplierModel>::find_by_id(self, id).await?;
        Ok(model.map(Supplier::from))
    }

    async fn insert(&self, supplier: Supplier) -> AppResult<u64> {
        let active_model = ActiveModel {
            id: Set(supplier.id),
            name: Set(supplier.name),
            document: Set(supplier.document),
            active: Set(supplier.active),
        };

        let rows = SupplierEntity::insert(active_model)
            .on_conflict(
                OnConflict::column(supplier::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(rows)
    }

    async fn update(&self, supplier: Supplier) -> AppResult<u64> {
        let result = SupplierEntity::update_many()
            .col_expr(supplier::Column::Name, Expr::value(supplier.name))
            .col_expr(supplier::Column::Document, Expr::value(supplier.document))
            .col_expr(supplier::Column::Active, Expr::value(supplier.active))
            .filter(supplier::Column::Id.eq(supplier.id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete(&self, id: Uuid) -> AppResult<u64> {
        DeleteRepository::<SupplierEntity>::delete_by_id(self, id).await
    }
}
