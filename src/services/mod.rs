//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on the `UnitOfWork` abstraction
//! rather than concrete stores.

mod auth_service;
pub mod container;
mod supplier_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{
    generate_token, verify_token, AuthService, Authenticator, Claims, TokenResponse, UserToken,
};
pub use supplier_service::{SupplierManager, SupplierService};
pub use user_service::{UserManager, UserService};
