//! HTTP request handlers.

pub mod auth_handler;
pub mod supplier_handler;

pub use auth_handler::auth_routes;
pub use supplier_handler::supplier_routes;
