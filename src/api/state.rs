//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{AuthService, ServiceContainer, Services, SupplierService};

/// Application state containing all services (DI container).
///
/// Cloned into every handler; only `Arc`s live here.
#[derive(Clone)]
pub struct AppState {
    /// Registration, sign-in and token verification
    pub auth_service: Arc<dyn AuthService>,
    /// Supplier CRUD
    pub supplier_service: Arc<dyn SupplierService>,
    /// Database connection, used by the health check
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::from_container(&container, database)
    }

    /// Take the HTTP-facing services out of a container.
    pub fn from_container(container: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            auth_service: container.auth(),
            supplier_service: container.suppliers(),
            database,
        }
    }
}
