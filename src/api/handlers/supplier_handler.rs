//! Supplier handlers.
//!
//! Reads are public. Writes need a bearer token, and delete also needs
//! the `RemoveSupplier` claim.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    middleware,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, require_claim, CurrentUser};
use crate::api::AppState;
use crate::config::CLAIM_REMOVE_SUPPLIER;
use crate::domain::{Supplier, SupplierPayload};
use crate::errors::{AppError, AppResult};
use crate::types::{Created, NoContent};

/// Create supplier routes. Write methods run behind the auth middleware.
pub fn supplier_routes(state: AppState) -> Router<AppState> {
    let authenticated = || middleware::from_fn_with_state(state.clone(), auth_middleware);

    Router::new()
        .route(
            "/supplier",
            get(list_suppliers).merge(post(create_supplier).route_layer(authenticated())),
        )
        .route(
            "/supplier/:id",
            get(get_supplier).merge(
                put(update_supplier)
                    .delete(delete_supplier)
                    .route_layer(authenticated()),
            ),
        )
}

/// List all suppliers
#[utoipa::path(
    get,
    path = "/supplier",
    tag = "Suppliers",
    responses(
        (status = 200, description = "Every supplier", body = Vec<Supplier>)
    )
)]
pub async fn list_suppliers(State(state): State<AppState>) -> AppResult<Json<Vec<Supplier>>> {
    let suppliers = state.supplier_service.list().await?;
    Ok(Json(suppliers))
}

/// Get supplier by ID
#[utoipa::path(
    get,
    path = "/supplier/{id}",
    tag = "Suppliers",
    params(("id" = Uuid, Path, description = "Supplier ID")),
    responses(
        (status = 200, description = "Supplier found", body = Supplier),
        (status = 404, description = "Supplier not found")
    )
)]
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Supplier>> {
    let supplier = state.supplier_service.get(id).await?;
    Ok(Json(supplier))
}

/// Create a supplier
#[utoipa::path(
    post,
    path = "/supplier",
    tag = "Suppliers",
    request_body = SupplierPayload,
    responses(
        (status = 201, description = "Supplier created", body = Supplier,
            headers(("Location" = String, description = "Path of the new supplier"))),
        (status = 400, description = "Validation error or nothing saved"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_supplier(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SupplierPayload>,
) -> AppResult<Created<Supplier>> {
    let supplier = state
        .supplier_service
        .create(payload.into_supplier(Uuid::new_v4()))
        .await?;

    Ok(Created::at(format!("/supplier/{}", supplier.id), supplier))
}

/// Update a supplier
///
/// The path id must exist; the row written is the one named by the body id.
#[utoipa::path(
    put,
    path = "/supplier/{id}",
    tag = "Suppliers",
    params(("id" = Uuid, Path, description = "Supplier ID")),
    request_body = SupplierPayload,
    responses(
        (status = 204, description = "Supplier updated"),
        (status = 400, description = "Validation error or nothing saved"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Supplier not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<SupplierPayload>, JsonRejection>,
) -> AppResult<NoContent> {
    let Json(payload) = payload.map_err(|e| AppError::validation(e.body_text()))?;
    state.supplier_service.update(id, payload).await?;
    Ok(NoContent)
}

/// Delete a supplier, answering with the removed record
#[utoipa::path(
    delete,
    path = "/supplier/{id}",
    tag = "Suppliers",
    params(("id" = Uuid, Path, description = "Supplier ID")),
    responses(
        (status = 201, description = "Supplier removed", body = Supplier),
        (status = 400, description = "Nothing removed"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing RemoveSupplier claim"),
        (status = 404, description = "Supplier not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_supplier(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Created<Supplier>> {
    require_claim(&current_user, CLAIM_REMOVE_SUPPLIER)?;

    let removed = state.supplier_service.delete(id).await?;
    Ok(Created::new(removed))
}
