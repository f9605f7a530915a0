//! Service Container - Centralized service access.

use std::sync::Arc;

use super::{AuthService, SupplierService, UserService};
use super::{Authenticator, SupplierManager, UserManager};
use crate::config::Config;
use crate::infra::{Persistence, UnitOfWork};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get supplier service
    fn suppliers(&self) -> Arc<dyn SupplierService>;

    /// Get user administration service
    fn users(&self) -> Arc<dyn UserService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    supplier_service: Arc<dyn SupplierService>,
    user_service: Arc<dyn UserService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        supplier_service: Arc<dyn SupplierService>,
        user_service: Arc<dyn UserService>,
    ) -> Self {
        Self {
            auth_service,
            supplier_service,
            user_service,
        }
    }

    /// Wire every service over one unit of work
    pub fn from_unit_of_work<U: UnitOfWork + 'static>(uow: Arc<U>, config: Config) -> Self {
        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            supplier_service: Arc::new(SupplierManager::new(uow.clone())),
            user_service: Arc::new(UserManager::new(uow)),
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        Self::from_unit_of_work(Arc::new(Persistence::new(db)), config)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn suppliers(&self) -> Arc<dyn SupplierService> {
        self.supplier_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }
}
