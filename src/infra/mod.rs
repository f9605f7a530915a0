//! Infrastructure layer - External systems integration
//!
//! Database connection, migrations, SeaORM entities and the repositories
//! built on them.

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{SupplierRepository, SupplierStore, UserRepository, UserStore};
pub use unit_of_work::{Persistence, Repositories, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockSupplierRepository, MockUserRepository};
