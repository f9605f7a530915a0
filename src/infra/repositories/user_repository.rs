//! Identity store: users, their claims and roles.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    Set, SqlErr,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::entities::{user_claim, user_role};
use crate::config::LockoutSettings;
use crate::domain::{normalize_email, user::duplicate_email_message, AccessFailure, User, UserClaim};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email, case-insensitively
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Persist a new user; a taken email yields `AppError::Identity`
    async fn create(&self, user: User) -> AppResult<User>;

    /// Count one failed sign-in and lock the account once the policy threshold
    /// is reached, as a single atomic step. An account that is already locked
    /// is left untouched.
    async fn record_access_failure(
        &self,
        id: Uuid,
        policy: LockoutSettings,
        now: DateTime<Utc>,
    ) -> AppResult<AccessFailure>;

    /// Reset the failed sign-in counter after a successful sign-in
    async fn reset_access_failures(&self, id: Uuid) -> AppResult<()>;

    /// Set or clear the lockout end
    async fn set_lockout_end(&self, id: Uuid, lockout_end: Option<DateTime<Utc>>) -> AppResult<()>;

    /// Claims granted to the user
    async fn claims(&self, id: Uuid) -> AppResult<Vec<UserClaim>>;

    /// Roles granted to the user
    async fn roles(&self, id: Uuid) -> AppResult<Vec<String>>;

    /// Grant a claim
    async fn add_claim(&self, id: Uuid, claim: UserClaim) -> AppResult<()>;

    /// Remove every claim of the given type, returning how many were removed
    async fn remove_claims(&self, id: Uuid, claim_type: &str) -> AppResult<u64>;

    /// Grant a role (no-op if already granted)
    async fn add_role(&self, id: Uuid, role: &str) -> AppResult<()>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn update_columns(
        &self,
        id: Uuid,
        columns: Vec<(user::Column, SimpleExpr)>,
    ) -> AppResult<()> {
        let mut query = UserEntity::update_many().filter(user::Column::Id.eq(id));
        for (column, value) in columns {
            query = query.col_expr(column, value);
        }
        query = query.col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()));

        let result = query.exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::NormalizedEmail.eq(normalize_email(email)))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn create(&self, user: User) -> AppResult<User> {
        let email = user.email.clone();
        let active_model = ActiveModel {
            id: Set(user.id),
            email: Set(user.email),
            normalized_email: Set(user.normalized_email),
            password_hash: Set(user.password_hash),
            email_confirmed: Set(user.email_confirmed),
            lockout_enabled: Set(user.lockout_enabled),
            access_failed_count: Set(user.access_failed_count),
            lockout_end: Set(user.lockout_end),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        };

        match active_model.insert(&self.db).await {
            Ok(model) => Ok(User::from(model)),
            Err(e) if is_unique_violation(&e) => {
                Err(AppError::Identity(vec![duplicate_email_message(&email)]))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn record_access_failure(
        &self,
        id: Uuid,
        policy: LockoutSettings,
        now: DateTime<Utc>,
    ) -> AppResult<AccessFailure> {
        // Both CASE arms read the pre-update count.
        let reaches_threshold =
            Expr::col(user::Column::AccessFailedCount).gte(policy.max_failed_attempts - 1);

        UserEntity::update_many()
            .col_expr(
                user::Column::AccessFailedCount,
                Into::<SimpleExpr>::into(
                    Expr::case(reaches_threshold.clone(), 0)
                        .finally(Expr::col(user::Column::AccessFailedCount).add(1)),
                ),
            )
            .col_expr(
                user::Column::LockoutEnd,
                Into::<SimpleExpr>::into(
                    Expr::case(reaches_threshold, Expr::value(now + policy.duration()))
                        .finally(Expr::col(user::Column::LockoutEnd)),
                ),
            )
            .col_expr(user::Column::UpdatedAt, Expr::value(now))
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::LockoutEnabled.eq(true))
            .filter(
                Condition::any()
                    .add(user::Column::LockoutEnd.is_null())
                    .add(user::Column::LockoutEnd.lte(now)),
            )
            .exec(&self.db)
            .await?;

        let stored = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        Ok(AccessFailure::observed(
            stored.access_failed_count,
            stored.lockout_end,
            now,
        ))
    }

    async fn reset_access_failures(&self, id: Uuid) -> AppResult<()> {
        self.update_columns(id, vec![(user::Column::AccessFailedCount, Expr::value(0))])
            .await
    }

    async fn set_lockout_end(&self, id: Uuid, lockout_end: Option<DateTime<Utc>>) -> AppResult<()> {
        self.update_columns(
            id,
            vec![
                (user::Column::LockoutEnd, Expr::value(lockout_end)),
                (user::Column::AccessFailedCount, Expr::value(0)),
            ],
        )
        .await
    }

    async fn claims(&self, id: Uuid) -> AppResult<Vec<UserClaim>> {
        let models = user_claim::Entity::find()
            .filter(user_claim::Column::UserId.eq(id))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(UserClaim::from).collect())
    }

    async fn roles(&self, id: Uuid) -> AppResult<Vec<String>> {
        let models = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(id))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(|m| m.role).collect())
    }

    async fn add_claim(&self, id: Uuid, claim: UserClaim) -> AppResult<()> {
        let active_model = user_claim::ActiveModel {
            user_id: Set(id),
            claim_type: Set(claim.claim_type),
            claim_value: Set(claim.claim_value),
            ..Default::default()
        };

        active_model.insert(&self.db).await?;
        Ok(())
    }

    async fn remove_claims(&self, id: Uuid, claim_type: &str) -> AppResult<u64> {
        let result = user_claim::Entity::delete_many()
            .filter(user_claim::Column::UserId.eq(id))
            .filter(user_claim::Column::ClaimType.eq(claim_type))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn add_role(&self, id: Uuid, role: &str) -> AppResult<()> {
        let active_model = user_role::ActiveModel {
            user_id: Set(id),
            role: Set(role.to_string()),
        };

        user_role::Entity::insert(active_model)
            .on_conflict(
                OnConflict::columns([user_role::Column::UserId, user_role::Column::Role])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(())
    }
}
