//! Per-user denormalized counters.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users_stats")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_stats_id: String,

    #[sea_orm(unique)]
    pub user_id: String,

    #[sea_orm(default_value = 0)]
    pub followers_count: i32,

    #[sea_orm(default_value = 0)]
    pub followings_count: i32,

    #[sea_orm(default_value = 0)]
    pub un_read_notifications_count: i32,

    /// Likes this user has given
    #[sea_orm(default_value = 0)]
    pub total_likes: i32,

    #[sea_orm(default_value = 0)]
    pub total_posts: i32,

    #[sea_orm(default_value = 0)]
    pub subscribers_count: i32,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub created_by: String,
    pub updated_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::UserId",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
