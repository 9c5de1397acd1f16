//! Comment and reply service.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use phinex_common::{AppError, AppResult, IdGenerator, Paginated, Pagination};
use phinex_db::{
    entities::{comment, like},
    repositories::{
        BlogCounter, BlogRepository, CommentCounter, CommentRepository, LikeRepository,
        UserRepository, UsersStatsRepository,
    },
};
use sea_orm::{DatabaseConnection, IntoActiveModel, Set, TransactionTrait};
use serde::Deserialize;
use validator::Validate;

use super::auth::CurrentUser;
use super::blog::blog_not_found;
use super::dto::{CommentView, LikeToggle, UserSummary};
use super::likes::{LikeTarget, toggle_like};
use super::non_empty;

/// Input for a comment or a reply.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 5000))]
    pub text: String,
    pub image: Option<String>,
    pub sticker: Option<String>,
    pub video: Option<String>,
    pub audio: Option<String>,
}

/// Partial update of a comment.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentInput {
    #[validate(length(max = 5000))]
    pub text: Option<String>,
    pub image: Option<String>,
    pub sticker: Option<String>,
    pub video: Option<String>,
    pub audio: Option<String>,
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    db: Arc<DatabaseConnection>,
    comment_repo: CommentRepository,
    blog_repo: BlogRepository,
    like_repo: LikeRepository,
    stats_repo: UsersStatsRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            comment_repo: CommentRepository::new(db.clone()),
            blog_repo: BlogRepository::new(db.clone()),
            like_repo: LikeRepository::new(db.clone()),
            stats_repo: UsersStatsRepository::new(db.clone()),
            user_repo: UserRepository::new(db.clone()),
            id_gen: IdGenerator::new(),
            db,
        }
    }

    /// Comment on a blog.
    pub async fn add_comment(
        &self,
        blog_id: &str,
        input: CreateCommentInput,
        actor: &CurrentUser,
    ) -> AppResult<CommentView> {
        input.validate()?;

        let txn = self.db.begin().await.map_err(AppError::database)?;

        self.blog_repo
            .find_by_id_in(&txn, blog_id)
            .await?
            .ok_or_else(|| blog_not_found(blog_id))?;

        let comment = self
            .comment_repo
            .create(&txn, self.new_comment(blog_id, input, actor))
            .await?;
        self.blog_repo
            .adjust(&txn, blog_id, BlogCounter::Comments, 1)
            .await?;

        txn.commit().await.map_err(AppError::database)?;

        tracing::info!(comment_id = %comment.comment_id, blog_id = %blog_id, "Comment added");
        self.view_one(comment, actor).await
    }

    /// Reply to a comment.
    pub async fn add_reply(
        &self,
        comment_id: &str,
        input: CreateCommentInput,
        actor: &CurrentUser,
    ) -> AppResult<CommentView> {
        input.validate()?;

        let txn = self.db.begin().await.map_err(AppError::database)?;

        self.comment_repo
            .find_by_id_in(&txn, comment_id)
            .await?
            .ok_or_else(|| comment_not_found(comment_id))?;

        let reply = self
            .comment_repo
            .create(&txn, self.new_comment(comment_id, input, actor))
            .await?;
        self.comment_repo
            .adjust(&txn, comment_id, CommentCounter::Replies, 1)
            .await?;

        txn.commit().await.map_err(AppError::database)?;

        tracing::info!(comment_id = %reply.comment_id, parent_id = %comment_id, "Reply added");
        self.view_one(reply, actor).await
    }

    /// Comments on a blog, newest first.
    pub async fn find_comments(
        &self,
        blog_id: &str,
        pagination: Pagination,
        viewer: &CurrentUser,
    ) -> AppResult<Paginated<CommentView>> {
        let (comments, total) = self.comment_repo.find_by_ref(blog_id, pagination).await?;
        let views = self.enrich(comments, viewer).await?;
        Ok(Paginated::new(views, pagination, total))
    }

    /// Replies to a comment, newest first.
    pub async fn find_replies(
        &self,
        comment_id: &str,
        pagination: Pagination,
        viewer: &CurrentUser,
    ) -> AppResult<Paginated<CommentView>> {
        let (replies, total) = self
            .comment_repo
            .find_by_ref(comment_id, pagination)
            .await?;
        let views = self.enrich(replies, viewer).await?;
        Ok(Paginated::new(views, pagination, total))
    }

    /// Apply the non-empty fields of `input`.
    pub async fn update_comment(
        &self,
        comment_id: &str,
        input: UpdateCommentInput,
        actor: &CurrentUser,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        let comment = self
            .comment_repo
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| comment_not_found(comment_id))?;
        actor.ensure_can_manage(&comment.user_id, "comment")?;

        let mut model = comment.into_active_model();
        if let Some(text) = non_empty(input.text) {
            model.text = Set(text);
        }
        if let Some(image) = non_empty(input.image) {
            model.image = Set(Some(image));
        }
        if let Some(sticker) = non_empty(input.sticker) {
            model.sticker = Set(Some(sticker));
        }
        if let Some(video) = non_empty(input.video) {
            model.video = Set(Some(video));
        }
        if let Some(audio) = non_empty(input.audio) {
            model.audio = Set(Some(audio));
        }
        model.updated_at = Set(Utc::now().fixed_offset());
        model.updated_by = Set(actor.user_id.clone());

        self.comment_repo.update(model).await
    }

    /// Delete a comment with its replies and the likes on it.
    pub async fn delete_comment(&self, comment_id: &str, actor: &CurrentUser) -> AppResult<()> {
        let txn = self.db.begin().await.map_err(AppError::database)?;

        let comment = self
            .comment_repo
            .find_by_id_in(&txn, comment_id)
            .await?
            .ok_or_else(|| comment_not_found(comment_id))?;
        actor.ensure_can_manage(&comment.user_id, "comment")?;

        let own_ref = [comment_id.to_string()];
        let mut liked_refs = self.comment_repo.ids_by_refs(&txn, &own_ref).await?;
        liked_refs.push(comment_id.to_string());
        self.like_repo.delete_by_refs(&txn, &liked_refs).await?;
        let replies = self.comment_repo.delete_by_refs(&txn, &own_ref).await?;

        if self
            .blog_repo
            .find_by_id_in(&txn, &comment.ref_id)
            .await?
            .is_some()
        {
            self.blog_repo
                .adjust(&txn, &comment.ref_id, BlogCounter::Comments, -1)
                .await?;
        } else if self
            .comment_repo
            .find_by_id_in(&txn, &comment.ref_id)
            .await?
            .is_some()
        {
            self.comment_repo
                .adjust(&txn, &comment.ref_id, CommentCounter::Replies, -1)
                .await?;
        } else {
            tracing::warn!(comment_id = %comment_id, ref_id = %comment.ref_id, "Comment parent is gone");
        }

        self.comment_repo.delete(&txn, comment_id).await?;
        txn.commit().await.map_err(AppError::database)?;

        tracing::info!(comment_id = %comment_id, replies, "Comment deleted");
        Ok(())
    }

    /// Like or unlike a comment.
    pub async fn like_comment(
        &self,
        comment_id: &str,
        actor: &CurrentUser,
    ) -> AppResult<LikeToggle> {
        let txn = self.db.begin().await.map_err(AppError::database)?;

        let comment = self
            .comment_repo
            .find_by_id_in(&txn, comment_id)
            .await?
            .ok_or_else(|| comment_not_found(comment_id))?;

        let toggle = toggle_like(
            &txn,
            &self.like_repo,
            &self.stats_repo,
            &self.id_gen,
            actor,
            LikeTarget::Comment {
                repo: &self.comment_repo,
                comment: &comment,
            },
        )
        .await?;

        txn.commit().await.map_err(AppError::database)?;
        Ok(toggle)
    }

    /// Likes on a comment, newest first.
    pub async fn find_comment_likes(&self, comment_id: &str) -> AppResult<Vec<like::Model>> {
        self.comment_repo
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| comment_not_found(comment_id))?;
        self.like_repo.find_by_ref(comment_id).await
    }

    fn new_comment(
        &self,
        ref_id: &str,
        input: CreateCommentInput,
        actor: &CurrentUser,
    ) -> comment::ActiveModel {
        comment::ActiveModel {
            comment_id: Set(self.id_gen.generate()),
            ref_id: Set(ref_id.to_string()),
            user_id: Set(actor.user_id.clone()),
            text: Set(input.text),
            image: Set(non_empty(input.image)),
            sticker: Set(non_empty(input.sticker)),
            video: Set(non_empty(input.video)),
            audio: Set(non_empty(input.audio)),
            created_by: Set(actor.user_id.clone()),
            updated_by: Set(actor.user_id.clone()),
            ..Default::default()
        }
    }

    async fn view_one(&self, comment: comment::Model, viewer: &CurrentUser) -> AppResult<CommentView> {
        self.enrich(vec![comment], viewer)
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("Enrichment dropped a comment".to_string()))
    }

    async fn enrich(
        &self,
        comments: Vec<comment::Model>,
        viewer: &CurrentUser,
    ) -> AppResult<Vec<CommentView>> {
        if comments.is_empty() {
            return Ok(vec![]);
        }

        let mut author_ids: Vec<String> = comments.iter().map(|c| c.user_id.clone()).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let authors: HashMap<String, UserSummary> = self
            .user_repo
            .find_by_ids(&author_ids)
            .await?
            .iter()
            .map(|u| (u.user_id.clone(), UserSummary::from(u)))
            .collect();

        let liked = match viewer.viewer_id() {
            Some(viewer_id) => {
                let ids: Vec<String> = comments.iter().map(|c| c.comment_id.clone()).collect();
                self.like_repo.liked_refs(viewer_id, &ids).await?
            }
            None => Default::default(),
        };

        Ok(comments
            .into_iter()
            .map(|comment| CommentView {
                author: authors.get(&comment.user_id).cloned(),
                liked: liked.contains(&comment.comment_id),
                replies_count: comment.replies_count,
                likes_count: comment.likes_count,
                comment,
            })
            .collect())
    }
}

fn comment_not_found(comment_id: &str) -> AppError {
    AppError::NotFound(format!("Comment with ID {comment_id} does not exist"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use phinex_db::entities::{RoleName, blog};
    use phinex_db::test_utils::fixtures;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction, Value};

    fn exec(rows: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: rows,
        }
    }

    fn actor(user_id: &str, roles: Vec<RoleName>) -> CurrentUser {
        CurrentUser::from_user(&fixtures::user(user_id, "Ada"), roles)
    }

    fn sql_of(service: CommentService, db: Arc<DatabaseConnection>) -> Vec<String> {
        drop(service);
        Arc::try_unwrap(db)
            .unwrap()
            .into_transaction_log()
            .iter()
            .flat_map(Transaction::statements)
            .map(|s| s.sql.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_add_comment_bumps_blog() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::blog("phib1", "phiowner")]])
                .append_query_results([[fixtures::comment("phic1", "phib1", "phi1")]])
                .append_query_results([[fixtures::user("phi1", "Ada")]])
                .append_query_results([Vec::<std::collections::BTreeMap<&str, Value>>::new()])
                .append_exec_results([exec(1)])
                .into_connection(),
        );
        let service = CommentService::new(db.clone());

        let view = service
            .add_comment(
                "phib1",
                CreateCommentInput {
                    text: "Nice".to_string(),
                    ..Default::default()
                },
                &actor("phi1", vec![RoleName::Authenticated]),
            )
            .await
            .unwrap();
        assert_eq!(view.comment.ref_id, "phib1");
        assert_eq!(view.author.unwrap().user_id, "phi1");

        let sql = sql_of(service, db);
        assert!(sql.iter().any(|s| s.contains(r#""comments_count" = "comments_count" + $1"#)));
    }

    #[tokio::test]
    async fn test_add_comment_to_missing_blog() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<blog::Model>::new()])
                .into_connection(),
        );
        let service = CommentService::new(db);

        let err = service
            .add_comment(
                "phigone",
                CreateCommentInput {
                    text: "Hello?".to_string(),
                    ..Default::default()
                },
                &actor("phi1", vec![RoleName::Authenticated]),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Blog with ID phigone does not exist");
    }

    #[tokio::test]
    async fn test_add_reply_bumps_parent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::comment("phic1", "phib1", "phiowner")]])
                .append_query_results([[fixtures::comment("phir1", "phic1", "phi1")]])
                .append_query_results([[fixtures::user("phi1", "Ada")]])
                .append_query_results([Vec::<std::collections::BTreeMap<&str, Value>>::new()])
                .append_exec_results([exec(1)])
                .into_connection(),
        );
        let service = CommentService::new(db.clone());

        let reply = service
            .add_reply(
                "phic1",
                CreateCommentInput {
                    text: "Agreed".to_string(),
                    ..Default::default()
                },
                &actor("phi1", vec![RoleName::Authenticated]),
            )
            .await
            .unwrap();
        assert_eq!(reply.comment.ref_id, "phic1");

        let sql = sql_of(service, db);
        assert!(sql.iter().any(|s| s.contains(r#""replies_count" = "replies_count" + $1"#)));
    }

    #[tokio::test]
    async fn test_delete_reply_decrements_parent_comment() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::comment("phir1", "phic1", "phi1")]])
                .append_query_results([Vec::<std::collections::BTreeMap<&str, Value>>::new()])
                .append_query_results([Vec::<blog::Model>::new()])
                .append_query_results([[fixtures::comment("phic1", "phib1", "phiowner")]])
                .append_exec_results([exec(0), exec(0), exec(1), exec(1)])
                .into_connection(),
        );
        let service = CommentService::new(db.clone());

        service
            .delete_comment("phir1", &actor("phi1", vec![RoleName::Authenticated]))
            .await
            .unwrap();

        let sql = sql_of(service, db);
        assert!(sql.iter().any(|s| s.contains(r#""replies_count" = "replies_count" - $1"#)));
        assert!(!sql.iter().any(|s| s.contains(r#""comments_count" = "comments_count" - "#)));
    }

    #[tokio::test]
    async fn test_admin_may_delete_others_comment() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::comment("phic1", "phib1", "phiowner")]])
                .append_query_results([Vec::<std::collections::BTreeMap<&str, Value>>::new()])
                .append_query_results([[fixtures::blog("phib1", "phiowner")]])
                .append_exec_results([exec(0), exec(0), exec(1), exec(1)])
                .into_connection(),
        );
        let service = CommentService::new(db.clone());

        service
            .delete_comment(
                "phic1",
                &actor("phiadmin", vec![RoleName::Authenticated, RoleName::Admin]),
            )
            .await
            .unwrap();

        let sql = sql_of(service, db);
        assert!(sql.iter().any(|s| s.contains(r#""comments_count" = "comments_count" - $1"#)));
    }

    #[tokio::test]
    async fn test_stranger_cannot_update() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::comment("phic1", "phib1", "phiowner")]])
                .into_connection(),
        );
        let service = CommentService::new(db);

        let err = service
            .update_comment(
                "phic1",
                UpdateCommentInput {
                    text: Some("edited".to_string()),
                    ..Default::default()
                },
                &actor("phistranger", vec![RoleName::Authenticated]),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "You are not allowed to modify this comment");
    }

    #[tokio::test]
    async fn test_like_comment() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::comment("phic1", "phib1", "phiowner")]])
                .append_query_results([Vec::<like::Model>::new()])
                .append_query_results([[fixtures::like("phil1", "phi1", "phic1")]])
                .append_exec_results([exec(1), exec(1)])
                .into_connection(),
        );
        let service = CommentService::new(db.clone());

        let toggle = service
            .like_comment("phic1", &actor("phi1", vec![RoleName::Authenticated]))
            .await
            .unwrap();
        assert_eq!(toggle, LikeToggle { liked: true, likes_count: 1 });

        let sql = sql_of(service, db);
        assert!(sql.iter().any(|s| s.starts_with(r#"UPDATE "comments" SET "likes_count""#)));
        assert!(sql.iter().any(|s| s.contains(r#""total_likes" = "total_likes" + $1"#)));
    }

    #[tokio::test]
    async fn test_find_comment_likes_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );
        let service = CommentService::new(db);

        let err = service.find_comment_likes("phigone").await.unwrap_err();
        assert_eq!(err.to_string(), "Comment with ID phigone does not exist");
    }
}
