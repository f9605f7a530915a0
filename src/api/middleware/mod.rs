//! API middleware.

mod auth;

pub use auth::{auth_middleware, require_claim, CurrentUser};
