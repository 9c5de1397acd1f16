//! Create blogs and pinned_blogs tables.

use sea_orm_migration::prelude::*;

use super::audit;
use super::m20250601_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut blogs = Table::create();
        blogs
            .table(Blogs::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Blogs::BlogId)
                    .string_len(32)
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Blogs::UserId).string_len(32).not_null())
            .col(ColumnDef::new(Blogs::Slug).string_len(320).not_null())
            .col(ColumnDef::new(Blogs::Title).string_len(255).not_null())
            .col(ColumnDef::new(Blogs::Url).string_len(512))
            .col(ColumnDef::new(Blogs::ExternalLink).text())
            .col(ColumnDef::new(Blogs::ExternalLinkTitle).string_len(255))
            .col(ColumnDef::new(Blogs::Text).text().not_null())
            .col(
                ColumnDef::new(Blogs::Images)
                    .json_binary()
                    .not_null()
                    .default(Expr::cust("'[]'::jsonb")),
            )
            .col(ColumnDef::new(Blogs::Video).text())
            .col(ColumnDef::new(Blogs::Audio).text())
            .col(
                ColumnDef::new(Blogs::IsReel)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_blogs_user")
                    .from(Blogs::Table, Blogs::UserId)
                    .to(Users::Table, Users::UserId)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        for counter in [
            Blogs::CommentsCount,
            Blogs::LikesCount,
            Blogs::SharesCount,
            Blogs::ViewsCount,
        ] {
            blogs.col(ColumnDef::new(counter).integer().not_null().default(0));
        }
        audit::columns(&mut blogs);
        manager.create_table(blogs).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blogs_user_id")
                    .table(Blogs::Table)
                    .col(Blogs::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blogs_created_at")
                    .table(Blogs::Table)
                    .col(Blogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        let mut pinned = Table::create();
        pinned
            .table(PinnedBlogs::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(PinnedBlogs::PinnedBlogId)
                    .string_len(32)
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(PinnedBlogs::BlogId)
                    .string_len(32)
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(PinnedBlogs::UserId).string_len(32).not_null())
            .col(
                ColumnDef::new(PinnedBlogs::StartDate)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(PinnedBlogs::EndDate)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_pinned_blogs_blog")
                    .from(PinnedBlogs::Table, PinnedBlogs::BlogId)
                    .to(Blogs::Table, Blogs::BlogId)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_pinned_blogs_user")
                    .from(PinnedBlogs::Table, PinnedBlogs::UserId)
                    .to(Users::Table, Users::UserId)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        audit::columns(&mut pinned);
        manager.create_table(pinned).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PinnedBlogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Blogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Blogs {
    Table,
    BlogId,
    UserId,
    Slug,
    Title,
    Url,
    ExternalLink,
    ExternalLinkTitle,
    Text,
    Images,
    Video,
    Audio,
    IsReel,
    CommentsCount,
    LikesCount,
    SharesCount,
    ViewsCount,
    CreatedAt,
}

#[derive(Iden)]
enum PinnedBlogs {
    Table,
    PinnedBlogId,
    BlogId,
    UserId,
    StartDate,
    EndDate,
}
