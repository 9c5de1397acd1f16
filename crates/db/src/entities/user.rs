//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "banned")]
    Banned,
    #[sea_orm(string_value = "suspended")]
    Suspended,
    #[sea_orm(string_value = "online")]
    Online,
}

impl UserStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Banned => "banned",
            Self::Suspended => "suspended",
            Self::Online => "online",
        }
    }

    /// Banned and suspended accounts may not act on the API.
    #[must_use]
    pub const fn is_restricted(self) -> bool {
        matches!(self, Self::Banned | Self::Suspended)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,

    #[sea_orm(nullable)]
    pub first_name: Option<String>,

    #[sea_orm(nullable)]
    pub middle_name: Option<String>,

    #[sea_orm(nullable)]
    pub last_name: Option<String>,

    pub full_name: String,

    #[sea_orm(nullable)]
    pub user_name: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub profile_image: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,

    #[sea_orm(nullable)]
    pub phone_number: Option<String>,

    pub status: UserStatus,

    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password: String,

    #[sea_orm(nullable)]
    pub gender: Option<String>,

    #[sea_orm(nullable)]
    pub dob: Option<String>,

    #[sea_orm(unique)]
    pub email: String,

    #[sea_orm(default_value = false)]
    pub verified: bool,

    #[sea_orm(default_value = false)]
    pub email_is_verified: bool,

    #[sea_orm(default_value = false)]
    pub phone_number_is_verified: bool,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub created_by: String,
    pub updated_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::users_stats::Entity")]
    UsersStats,

    #[sea_orm(has_one = "super::wallet::Entity")]
    Wallet,

    #[sea_orm(has_many = "super::user_role::Entity")]
    UserRoles,

    #[sea_orm(has_many = "super::blog::Entity")]
    Blogs,
}

impl Related<super::users_stats::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UsersStats.def()
    }
}

impl Related<super::wallet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallet.def()
    }
}

impl Related<super::user_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRoles.def()
    }
}

impl Related<super::blog::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Blogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
