//! Authentication handlers.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::TokenResponse;

/// User registration request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    /// User email address
    #[validate(email(message = "The field email is not a valid e-mail address"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Password, checked again against the identity policy
    #[validate(length(
        min = 6,
        max = 100,
        message = "The field password must be between 6 and 100 characters"
    ))]
    #[schema(example = "Secret1!", min_length = 6, max_length = 100)]
    pub password: String,
    /// Must repeat `password`
    #[validate(must_match(other = "password", message = "The passwords do not match"))]
    #[schema(example = "Secret1!")]
    pub confirm_password: String,
}

/// User login request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    /// User email address
    #[validate(email(message = "The field email is not a valid e-mail address"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User password
    #[validate(length(
        min = 6,
        max = 100,
        message = "The field password must be between 6 and 100 characters"
    ))]
    #[schema(example = "Secret1!")]
    pub password: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new user and sign them in
#[utoipa::path(
    post,
    path = "/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered and signed in", body = TokenResponse),
        (status = 400, description = "Validation error, duplicate email or password policy violation")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .register(payload.email, payload.password)
        .await?;

    Ok(Json(token))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error, invalid credentials or account locked")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(token))
}
