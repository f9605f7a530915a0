//! Identity user database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    #[sea_orm(unique)]
    pub normalized_email: String,
    pub password_hash: String,
    pub email_confirmed: bool,
    pub lockout_enabled: bool,
    pub access_failed_count: i32,
    pub lockout_end: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_claim::Entity")]
    Claims,
    #[sea_orm(has_many = "super::user_role::Entity")]
    Roles,
}

impl Related<super::user_claim::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Claims.def()
    }
}

impl Related<super::user_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Roles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            email: model.email,
            normalized_email: model.normalized_email,
            password_hash: model.password_hash,
            email_confirmed: model.email_confirmed,
            lockout_enabled: model.lockout_enabled,
            access_failed_count: model.access_failed_count,
            lockout_end: model.lockout_end,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
