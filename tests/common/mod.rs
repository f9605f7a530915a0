//! Shared fixtures for the HTTP tests: in-memory stores and request helpers.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use supplier_api::api::{create_router, AppState};
use supplier_api::config::{Config, LockoutSettings};
use supplier_api::domain::user::duplicate_email_message;
use supplier_api::domain::{normalize_email, AccessFailure, Supplier, User, UserClaim};
use supplier_api::errors::{AppError, AppResult};
use supplier_api::infra::{Database, Repositories, SupplierRepository, UserRepository};
use supplier_api::services::{generate_token, Services};

pub const SECRET: &str = "integration-test-secret-at-least-32-chars";
pub const MAX_FAILED_ATTEMPTS: i32 = 3;

// =============================================================================
// In-memory stores
// =============================================================================

#[derive(Default)]
pub struct InMemorySuppliers {
    rows: Mutex<Vec<Supplier>>,
}

#[async_trait]
impl SupplierRepository for InMemorySuppliers {
    async fn list(&self) -> AppResult<Vec<Supplier>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Supplier>> {
        Ok(self.rows.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn insert(&self, supplier: Supplier) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|s| s.id == supplier.id) {
            return Ok(0);
        }
        rows.push(supplier);
        Ok(1)
    }

    async fn update(&self, supplier: Supplier) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|s| s.id == supplier.id) {
            Some(row) => {
                *row = supplier;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|s| s.id != id);
        Ok((before - rows.len()) as u64)
    }
}

#[derive(Default)]
struct StoredUser {
    user: Option<User>,
    claims: Vec<UserClaim>,
    roles: Vec<String>,
}

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<HashMap<Uuid, StoredUser>>,
}

impl InMemoryUsers {
    fn modify<R>(&self, id: Uuid, f: impl FnOnce(&mut StoredUser) -> R) -> AppResult<R> {
        let mut rows = self.rows.lock().unwrap();
        rows.get_mut(&id).map(f).ok_or(AppError::NotFound)
    }

    fn with_user(&self, id: Uuid, f: impl FnOnce(&mut User)) -> AppResult<()> {
        self.modify(id, |stored| {
            if let Some(user) = stored.user.as_mut() {
                f(user);
                user.updated_at = Utc::now();
            }
        })
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&id)
            .and_then(|s| s.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let normalized = normalize_email(email);
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter_map(|s| s.user.as_ref())
            .find(|u| u.normalized_email == normalized)
            .cloned())
    }

    async fn create(&self, user: User) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        let taken = rows
            .values()
            .filter_map(|s| s.user.as_ref())
            .any(|u| u.normalized_email == user.normalized_email);
        if taken {
            return Err(AppError::identity(duplicate_email_message(&user.email)));
        }

        rows.insert(
            user.id,
            StoredUser {
                user: Some(user.clone()),
                ..Default::default()
            },
        );
        Ok(user)
    }

    async fn record_access_failure(
        &self,
        id: Uuid,
        policy: LockoutSettings,
        now: DateTime<Utc>,
    ) -> AppResult<AccessFailure> {
        let mut rows = self.rows.lock().unwrap();
        let user = rows
            .get_mut(&id)
            .and_then(|s| s.user.as_mut())
            .ok_or(AppError::NotFound)?;

        if user.lockout_enabled && !user.is_locked_out(now) {
            if user.access_failed_count + 1 >= policy.max_failed_attempts {
                user.access_failed_count = 0;
                user.lockout_end = Some(now + policy.duration());
            } else {
                user.access_failed_count += 1;
            }
            user.updated_at = now;
        }

        Ok(AccessFailure::observed(
            user.access_failed_count,
            user.lockout_end,
            now,
        ))
    }

    async fn reset_access_failures(&self, id: Uuid) -> AppResult<()> {
        self.with_user(id, |u| u.access_failed_count = 0)
    }

    async fn set_lockout_end(&self, id: Uuid, lockout_end: Option<DateTime<Utc>>) -> AppResult<()> {
        self.with_user(id, |u| {
            u.lockout_end = lockout_end;
            u.access_failed_count = 0;
        })
    }

    async fn claims(&self, id: Uuid) -> AppResult<Vec<UserClaim>> {
        self.modify(id, |s| s.claims.clone())
    }

    async fn roles(&self, id: Uuid) -> AppResult<Vec<String>> {
        self.modify(id, |s| s.roles.clone())
    }

    async fn add_claim(&self, id: Uuid, claim: UserClaim) -> AppResult<()> {
        self.modify(id, |s| s.claims.push(claim))
    }

    async fn remove_claims(&self, id: Uuid, claim_type: &str) -> AppResult<u64> {
        self.modify(id, |s| {
            let before = s.claims.len();
            s.claims.retain(|c| c.claim_type != claim_type);
            (before - s.claims.len()) as u64
        })
    }

    async fn add_role(&self, id: Uuid, role: &str) -> AppResult<()> {
        self.modify(id, |s| {
            if !s.roles.iter().any(|r| r == role) {
                s.roles.push(role.to_string());
            }
        })
    }
}

// =============================================================================
// Application under test
// =============================================================================

pub struct TestApp {
    pub router: Router,
    pub config: Config,
    pub suppliers: Arc<InMemorySuppliers>,
    pub users: Arc<InMemoryUsers>,
}

impl TestApp {
    pub fn new() -> Self {
        let mut config = Config::with_secret(SECRET);
        config.lockout = LockoutSettings {
            max_failed_attempts: MAX_FAILED_ATTEMPTS,
            duration_minutes: 5,
        };

        let suppliers = Arc::new(InMemorySuppliers::default());
        let users = Arc::new(InMemoryUsers::default());
        let uow = Arc::new(Repositories::new(suppliers.clone(), users.clone()));
        let services = Services::from_unit_of_work(uow, config.clone());

        // Disconnected pool: only the health check touches it.
        let database = Arc::new(Database::from_connection(DatabaseConnection::default()));
        let router = create_router(AppState::from_container(&services, database));

        Self {
            router,
            config,
            suppliers,
            users,
        }
    }

    pub async fn suppliers_is_empty(&self) -> bool {
        self.suppliers.list().await.unwrap().is_empty()
    }

    /// Bearer token for a caller that does not exist in the user store.
    pub fn token_with_claims(&self, claims: Vec<UserClaim>) -> String {
        let user = User::new("caller@example.com".to_string(), "unused".to_string());
        generate_token(&user, claims, vec![], &self.config)
            .unwrap()
            .access_token
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let request = match body {
            Some(json) => json_request(method, uri, token, json.to_string()),
            None => {
                let mut builder = Request::builder().method(method).uri(uri);
                if let Some(token) = token {
                    builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
                }
                builder.body(Body::empty()).unwrap()
            }
        };

        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn send_raw(&self, method: Method, uri: &str, token: &str, raw: &str) -> Response {
        let request = json_request(method, uri, Some(token), raw.to_string());
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: String) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body)).unwrap()
}

pub async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status");
}
