//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod supplier;
pub mod user;
pub mod user_claim;
pub mod user_role;
