//! Authentication service - registration, sign-in with lockout, tokens.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::password::policy_violations;
use crate::domain::user::duplicate_email_message;
use crate::domain::{Password, User, UserClaim};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Verified when the email is unknown so both failure paths cost one argon2 run.
static DUMMY_PASSWORD: Lazy<Option<Password>> =
    Lazy::new(|| Password::new("Unused-dummy-passw0rd").ok());

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub jti: Uuid,
    pub nbf: i64,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub claims: Vec<UserClaim>,
}

/// User summary returned alongside the token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserToken {
    pub id: Uuid,
    #[schema(example = "user@example.com")]
    pub email: String,
    pub claims: Vec<UserClaim>,
}

/// Token response returned after successful authentication
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 7200)]
    pub expires_in: i64,
    pub user_token: UserToken,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and sign them in
    async fn register(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Sign in with lockout tracking and return a token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Sign a token for the user carrying their claims and roles
pub fn generate_token(
    user: &User,
    claims: Vec<UserClaim>,
    roles: Vec<String>,
    config: &Config,
) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let payload = Claims {
        sub: user.id,
        email: user.email.clone(),
        jti: Uuid::new_v4(),
        nbf: now.timestamp(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
        iss: config.jwt_issuer.clone(),
        aud: config.jwt_audience.clone(),
        roles,
        claims: claims.clone(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &payload,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
        user_token: UserToken {
            id: user.id,
            email: user.email.clone(),
            claims,
        },
    })
}

/// Verify signature, lifetime, issuer and audience
pub fn verify_token(token: &str, config: &Config) -> AppResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.jwt_issuer.as_str()]);
    validation.set_audience(&[config.jwt_audience.as_str()]);
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }

    async fn issue_token(&self, user: &User) -> AppResult<TokenResponse> {
        let users = self.uow.users();
        let claims = users.claims(user.id).await?;
        let roles = users.roles(user.id).await?;
        generate_token(user, claims, roles, &self.config)
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let email = email.trim().to_string();
        let users = self.uow.users();

        let mut errors = Vec::new();
        if users.find_by_email(&email).await?.is_some() {
            errors.push(duplicate_email_message(&email));
        }
        errors.extend(policy_violations(&password));
        if !errors.is_empty() {
            return Err(AppError::Identity(errors));
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = users.create(User::new(email, password_hash)).await?;
        tracing::info!(user_id = %user.id, "User registered");

        self.issue_token(&user).await
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let users = self.uow.users();

        let Some(user) = users.find_by_email(&email).await? else {
            if let Some(dummy) = DUMMY_PASSWORD.as_ref() {
                dummy.verify(&password);
            }
            return Err(AppError::InvalidCredentials);
        };

        let now = Utc::now();
        if user.is_locked_out(now) {
            tracing::warn!(
                user_id = %user.id,
                remaining_secs = user.lockout_remaining(now).map(|d| d.num_seconds()),
                "Sign-in rejected, account locked out"
            );
            return Err(AppError::LockedOut);
        }

        if !Password::from_hash(user.password_hash.clone()).verify(&password) {
            let failure = users
                .record_access_failure(user.id, self.config.lockout, now)
                .await?;

            if failure.locked() {
                tracing::warn!(user_id = %user.id, "Account locked out after failed sign-ins");
                return Err(AppError::LockedOut);
            }
            return Err(AppError::InvalidCredentials);
        }

        if user.access_failed_count != 0 {
            users.reset_access_failures(user.id).await?;
        }

        tracing::info!(user_id = %user.id, "User signed in");
        self.issue_token(&user).await
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token(token, &self.config)
    }
}
