//! API layer - HTTP handlers and middleware
//!
//! Request handlers, the JWT middleware, the validating JSON extractor
//! and the route table.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
