//! Blog post entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blogs")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub blog_id: String,

    pub user_id: String,

    pub slug: String,

    pub title: String,

    #[sea_orm(nullable)]
    pub url: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub external_link: Option<String>,

    #[sea_orm(nullable)]
    pub external_link_title: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub text: String,

    /// Image URLs (JSON array)
    #[sea_orm(column_type = "JsonBinary")]
    pub images: Json,

    #[sea_orm(column_type = "Text", nullable)]
    pub video: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub audio: Option<String>,

    /// True when the post carries a video
    #[sea_orm(default_value = false)]
    pub is_reel: bool,

    #[sea_orm(default_value = 0)]
    pub comments_count: i32,

    #[sea_orm(default_value = 0)]
    pub likes_count: i32,

    #[sea_orm(default_value = 0)]
    pub shares_count: i32,

    #[sea_orm(default_value = 0)]
    pub views_count: i32,

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

    #[sea_orm(has_one = "super::pinned_blog::Entity")]
    PinnedBlog,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::pinned_blog::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PinnedBlog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
