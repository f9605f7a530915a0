//! Domain layer - Core business entities and logic
//!
//! Suppliers, identity users with their lockout rules, and the password
//! value object. Nothing here touches the database.

pub mod password;
pub mod supplier;
pub mod user;

pub use password::Password;
pub use supplier::{Supplier, SupplierPayload};
pub use user::{normalize_email, AccessFailure, User, UserClaim};
