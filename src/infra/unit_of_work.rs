//! Unit of Work - centralized repository access.
//!
//! Every request performs a single-row operation, so the unit of work only
//! hands out repositories sharing one connection pool.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{SupplierRepository, SupplierStore, UserRepository, UserStore};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    /// Get supplier repository
    fn suppliers(&self) -> Arc<dyn SupplierRepository>;

    /// Get identity store
    fn users(&self) -> Arc<dyn UserRepository>;
}

/// Concrete implementation of UnitOfWork over a SeaORM connection
pub struct Persistence {
    supplier_repo: Arc<SupplierStore>,
    user_repo: Arc<UserStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            supplier_repo: Arc::new(SupplierStore::new(db.clone())),
            user_repo: Arc::new(UserStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn suppliers(&self) -> Arc<dyn SupplierRepository> {
        self.supplier_repo.clone()
    }

    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }
}

/// Unit of work over arbitrary repository implementations.
///
/// Lets the services run against in-memory or mocked stores.
pub struct Repositories {
    suppliers: Arc<dyn SupplierRepository>,
    users: Arc<dyn UserRepository>,
}

impl Repositories {
    pub fn new(suppliers: Arc<dyn SupplierRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { suppliers, users }
    }
}

impl UnitOfWork for Repositories {
    fn suppliers(&self) -> Arc<dyn SupplierRepository> {
        self.suppliers.clone()
    }

    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }
}
