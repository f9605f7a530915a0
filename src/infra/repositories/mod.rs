//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod base;
pub(crate) mod entities;
mod supplier_repository;
mod user_repository;

pub use base::{DeleteRepository, ReadRepository};
pub use supplier_repository::{SupplierRepository, SupplierStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use supplier_repository::MockSupplierRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
