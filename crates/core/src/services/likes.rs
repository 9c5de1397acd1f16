//! Like toggling shared by blogs and comments.

use phinex_common::{AppResult, IdGenerator};
use phinex_db::{
    entities::{blog, comment, like},
    repositories::{
        BlogCounter, BlogRepository, CommentCounter, CommentRepository, LikeRepository,
        StatCounter, UsersStatsRepository,
    },
};
use sea_orm::{ConnectionTrait, Set};

use super::auth::CurrentUser;
use super::dto::LikeToggle;

/// What a like points at.
pub(crate) enum LikeTarget<'a> {
    Blog {
        repo: &'a BlogRepository,
        blog: &'a blog::Model,
    },
    Comment {
        repo: &'a CommentRepository,
        comment: &'a comment::Model,
    },
}

impl LikeTarget<'_> {
    fn ref_id(&self) -> &str {
        match self {
            Self::Blog { blog, .. } => &blog.blog_id,
            Self::Comment { comment, .. } => &comment.comment_id,
        }
    }

    const fn likes_count(&self) -> i32 {
        match self {
            Self::Blog { blog, .. } => blog.likes_count,
            Self::Comment { comment, .. } => comment.likes_count,
        }
    }

    async fn adjust<C: ConnectionTrait>(&self, conn: &C, delta: i32) -> AppResult<()> {
        match self {
            Self::Blog { repo, blog } => {
                repo.adjust(conn, &blog.blog_id, BlogCounter::Likes, delta)
                    .await
            }
            Self::Comment { repo, comment } => {
                repo.adjust(conn, &comment.comment_id, CommentCounter::Likes, delta)
                    .await
            }
        }
    }
}

/// Flip the actor's like on `target`, keeping the target's `likes_count` and the
/// actor's `total_likes` in step. Runs on the caller's transaction.
pub(crate) async fn toggle_like<C: ConnectionTrait>(
    conn: &C,
    like_repo: &LikeRepository,
    stats_repo: &UsersStatsRepository,
    id_gen: &IdGenerator,
    actor: &CurrentUser,
    target: LikeTarget<'_>,
) -> AppResult<LikeToggle> {
    let ref_id = target.ref_id().to_string();

    let toggle = if let Some(existing) = like_repo.find_by_pair(conn, &actor.user_id, &ref_id).await? {
        like_repo.delete(conn, &existing.like_id).await?;
        target.adjust(conn, -1).await?;
        stats_repo
            .decrement(conn, &actor.user_id, StatCounter::TotalLikes)
            .await?;
        LikeToggle {
            liked: false,
            likes_count: (target.likes_count() - 1).max(0),
        }
    } else {
        like_repo
            .create(
                conn,
                like::ActiveModel {
                    like_id: Set(id_gen.generate()),
                    user_id: Set(actor.user_id.clone()),
                    ref_id: Set(ref_id.clone()),
                    created_by: Set(actor.user_id.clone()),
                    updated_by: Set(actor.user_id.clone()),
                    ..Default::default()
                },
            )
            .await?;
        target.adjust(conn, 1).await?;
        stats_repo
            .increment(conn, &actor.user_id, StatCounter::TotalLikes)
            .await?;
        LikeToggle {
            liked: true,
            likes_count: target.likes_count() + 1,
        }
    };

    tracing::debug!(ref_id = %ref_id, user_id = %actor.user_id, liked = toggle.liked, "Like toggled");
    Ok(toggle)
}
