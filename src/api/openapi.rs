//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, supplier_handler};
use crate::domain::{Supplier, SupplierPayload, UserClaim};
use crate::services::{TokenResponse, UserToken};

/// OpenAPI documentation for the supplier API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Supplier API",
        version = "0.1.0",
        description = "Supplier registry with token-based authentication"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        // Supplier endpoints
        supplier_handler::list_suppliers,
        supplier_handler::get_supplier,
        supplier_handler::create_supplier,
        supplier_handler::update_supplier,
        supplier_handler::delete_supplier,
    ),
    components(
        schemas(
            Supplier,
            SupplierPayload,
            UserClaim,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            TokenResponse,
            UserToken,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Suppliers", description = "Supplier registry")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /login"))
                        .build(),
                ),
            );
        }
    }
}
