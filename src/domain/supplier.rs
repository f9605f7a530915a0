//! Supplier domain entity and request payload.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Supplier domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Supplier {
    /// Unique supplier identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// Supplier name
    #[schema(example = "Acme")]
    pub name: String,
    /// Fixed-format registration document (e.g. tax id)
    #[schema(example = "12345678901234")]
    pub document: String,
    /// Whether the supplier is active
    pub active: bool,
}

/// Supplier payload accepted by the create and update endpoints.
///
/// `id` may be supplied by the caller; when absent, create assigns a fresh
/// one and update falls back to the path id. Missing fields read as empty
/// so validation reports them per field.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct SupplierPayload {
    /// Optional caller-chosen identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Option<Uuid>,
    /// Supplier name
    #[validate(
        length(min = 1, max = 200, message = "The field name must be between 1 and 200 characters"),
        custom(function = "not_blank", message = "The field name is required")
    )]
    #[schema(example = "Acme", max_length = 200)]
    pub name: String,
    /// Registration document
    #[validate(
        length(min = 1, max = 14, message = "The field document must be between 1 and 14 characters"),
        custom(function = "not_blank", message = "The field document is required")
    )]
    #[schema(example = "12345678901234", max_length = 14)]
    pub document: String,
    /// Whether the supplier is active
    pub active: bool,
}

/// Rejects values made only of whitespace.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

impl SupplierPayload {
    /// Build the entity, using `fallback_id` when the payload carries none.
    pub fn into_supplier(self, fallback_id: Uuid) -> Supplier {
        Supplier {
            id: self.id.unwrap_or(fallback_id),
            name: self.name,
            document: self.document,
            active: self.active,
        }
    }
}
