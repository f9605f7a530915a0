//! User administration - claims, roles and lockout management.
//!
//! Not reachable over HTTP; the `users` CLI command drives it.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{User, UserClaim};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// User administration trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Find a user by email
    async fn get_by_email(&self, email: &str) -> AppResult<User>;

    /// Grant a claim to the user
    async fn grant_claim(&self, email: &str, claim: UserClaim) -> AppResult<()>;

    /// Remove every claim of a type, returning how many were removed
    async fn revoke_claim(&self, email: &str, claim_type: &str) -> AppResult<u64>;

    /// Grant a role to the user
    async fn add_role(&self, email: &str, role: &str) -> AppResult<()>;

    /// Clear lockout state
    async fn unlock(&self, email: &str) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_by_email(&self, email: &str) -> AppResult<User> {
        self.uow.users().find_by_email(email).await?.ok_or_not_found()
    }

    async fn grant_claim(&self, email: &str, claim: UserClaim) -> AppResult<()> {
        let user = self.get_by_email(email).await?;
        tracing::info!(user_id = %user.id, claim_type = %claim.claim_type, "Granting claim");
        self.uow.users().add_claim(user.id, claim).await
    }

    async fn revoke_claim(&self, email: &str, claim_type: &str) -> AppResult<u64> {
        let user = self.get_by_email(email).await?;
        self.uow.users().remove_claims(user.id, claim_type).await
    }

    async fn add_role(&self, email: &str, role: &str) -> AppResult<()> {
        let user = self.get_by_email(email).await?;
        self.uow.users().add_role(user.id, role).await
    }

    async fn unlock(&self, email: &str) -> AppResult<()> {
        let user = self.get_by_email(email).await?;
        self.uow.users().set_lockout_end(user.id, None).await
    }
}
