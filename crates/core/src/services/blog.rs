//! Blog service.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use chrono::{Duration, Utc};
use phinex_common::{AppError, AppResult, IdGenerator, Paginated, Pagination};
use phinex_db::{
    entities::{blog, pinned_blog, share, view},
    repositories::{
        BlogCounter, BlogOrder, BlogRepository, CommentRepository, FollowRepository,
        LikeRepository, PinnedBlogRepository, ShareRepository, StatCounter, UserRepository,
        UsersStatsRepository, ViewRepository,
    },
};
use regex::Regex;
use sea_orm::{DatabaseConnection, IntoActiveModel, Set, TransactionTrait};
use serde::Deserialize;
use validator::Validate;

use super::auth::CurrentUser;
use super::dto::{BlogView, LikeToggle, SessionUsers, UserSummary};
use super::likes::{LikeTarget, toggle_like};
use super::non_empty;

/// Pin length used when the caller does not pass one.
pub const DEFAULT_PIN_DAYS: i64 = 7;

#[allow(clippy::unwrap_used)]
static SLUG_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Input for creating a blog.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(length(max = 512))]
    pub url: Option<String>,
    pub external_link: Option<String>,
    #[validate(length(max = 255))]
    pub external_link_title: Option<String>,
    pub images: Option<Vec<String>>,
    pub video: Option<String>,
    pub audio: Option<String>,
    /// Accepts the legacy `RepostedFromBlogId` spelling too.
    #[serde(alias = "RepostedFromBlogId")]
    pub reposted_from_blog_id: Option<String>,
    #[serde(default)]
    pub pinned: bool,
    #[validate(range(min = 1, max = 365))]
    pub pinned_number_of_days: Option<i64>,
}

/// Partial update of a blog. Empty strings leave the column unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogInput {
    #[validate(length(max = 255))]
    pub title: Option<String>,
    pub text: Option<String>,
    #[validate(length(max = 512))]
    pub url: Option<String>,
    pub external_link: Option<String>,
    #[validate(length(max = 255))]
    pub external_link_title: Option<String>,
    pub images: Option<Vec<String>>,
    pub video: Option<String>,
    pub audio: Option<String>,
}

/// Blog service for business logic.
#[derive(Clone)]
pub struct BlogService {
    db: Arc<DatabaseConnection>,
    blog_repo: BlogRepository,
    comment_repo: CommentRepository,
    like_repo: LikeRepository,
    share_repo: ShareRepository,
    view_repo: ViewRepository,
    pinned_repo: PinnedBlogRepository,
    stats_repo: UsersStatsRepository,
    user_repo: UserRepository,
    follow_repo: FollowRepository,
    id_gen: IdGenerator,
}

impl BlogService {
    /// Create a new blog service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            blog_repo: BlogRepository::new(db.clone()),
            comment_repo: CommentRepository::new(db.clone()),
            like_repo: LikeRepository::new(db.clone()),
            share_repo: ShareRepository::new(db.clone()),
            view_repo: ViewRepository::new(),
            pinned_repo: PinnedBlogRepository::new(db.clone()),
            stats_repo: UsersStatsRepository::new(db.clone()),
            user_repo: UserRepository::new(db.clone()),
            follow_repo: FollowRepository::new(db.clone()),
            id_gen: IdGenerator::new(),
            db,
        }
    }

    /// Discovery feed.
    pub async fn find_all(
        &self,
        pagination: Pagination,
        order: BlogOrder,
        viewer: &CurrentUser,
    ) -> AppResult<Paginated<BlogView>> {
        let (blogs, total) = self.blog_repo.find_page(order, pagination).await?;
        let views = self.enrich(blogs, viewer).await?;
        Ok(Paginated::new(views, pagination, total))
    }

    /// Fetch one blog, counting the fetch as a view.
    pub async fn find_one(&self, blog_id: &str, viewer: &CurrentUser) -> AppResult<BlogView> {
        let txn = self.db.begin().await.map_err(AppError::database)?;

        let mut blog = self
            .blog_repo
            .find_by_id_in(&txn, blog_id)
            .await?
            .ok_or_else(|| blog_not_found(blog_id))?;

        self.blog_repo
            .adjust(&txn, blog_id, BlogCounter::Views, 1)
            .await?;

        let viewer_id = viewer.viewer_id().map(str::to_owned);
        let audit = viewer.audit_id();
        self.view_repo
            .create(
                &txn,
                view::ActiveModel {
                    view_id: Set(self.id_gen.generate()),
                    user_id: Set(viewer_id),
                    ref_id: Set(blog_id.to_string()),
                    created_by: Set(audit.clone()),
                    updated_by: Set(audit),
                    ..Default::default()
                },
            )
            .await?;

        txn.commit().await.map_err(AppError::database)?;

        blog.views_count += 1;
        self.enrich_one(blog, viewer).await
    }

    /// One author's blogs, newest first.
    pub async fn find_user_blogs(
        &self,
        user_id: &str,
        pagination: Pagination,
        viewer: &CurrentUser,
    ) -> AppResult<Paginated<BlogView>> {
        let (blogs, total) = self.blog_repo.find_by_user(user_id, pagination).await?;
        let views = self.enrich(blogs, viewer).await?;
        Ok(Paginated::new(views, pagination, total))
    }

    /// Blogs by the viewer and the people they follow, newest first.
    pub async fn find_following_blogs(
        &self,
        pagination: Pagination,
        viewer: &CurrentUser,
    ) -> AppResult<Paginated<BlogView>> {
        let (blogs, total) = self
            .blog_repo
            .find_following_feed(&viewer.user_id, pagination)
            .await?;
        let views = self.enrich(blogs, viewer).await?;
        Ok(Paginated::new(views, pagination, total))
    }

    /// Blogs whose pin window contains the current time, most recent pin first.
    pub async fn find_pinned_blogs(
        &self,
        pagination: Pagination,
        viewer: &CurrentUser,
    ) -> AppResult<Paginated<BlogView>> {
        let now = Utc::now().fixed_offset();
        let (pins, total) = self.pinned_repo.find_active(now, pagination).await?;

        let ids: Vec<String> = pins.iter().map(|p| p.blog_id.clone()).collect();
        let mut by_id: HashMap<String, blog::Model> = self
            .blog_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|b| (b.blog_id.clone(), b))
            .collect();
        let ordered: Vec<blog::Model> = ids.iter().filter_map(|id| by_id.remove(id)).collect();

        let views = self.enrich(ordered, viewer).await?;
        Ok(Paginated::new(views, pagination, total))
    }

    /// Create a blog, optionally as a repost or with a pin.
    pub async fn create(&self, input: CreateBlogInput, actor: &CurrentUser) -> AppResult<blog::Model> {
        input.validate()?;

        let blog_id = self.id_gen.generate();
        let video = non_empty(input.video);
        let repost_of = non_empty(input.reposted_from_blog_id);
        let pin_days = input.pinned_number_of_days.unwrap_or(DEFAULT_PIN_DAYS);

        let txn = self.db.begin().await.map_err(AppError::database)?;

        if let Some(source_id) = &repost_of {
            self.blog_repo
                .find_by_id_in(&txn, source_id)
                .await?
                .ok_or_else(|| blog_not_found(source_id))?;
        }

        let model = blog::ActiveModel {
            blog_id: Set(blog_id.clone()),
            user_id: Set(actor.user_id.clone()),
            slug: Set(slugify(&input.title, &blog_id)),
            title: Set(input.title),
            url: Set(non_empty(input.url)),
            external_link: Set(non_empty(input.external_link)),
            external_link_title: Set(non_empty(input.external_link_title)),
            text: Set(input.text),
            images: Set(serde_json::json!(input.images.unwrap_or_default())),
            is_reel: Set(video.is_some()),
            video: Set(video),
            audio: Set(non_empty(input.audio)),
            created_by: Set(actor.user_id.clone()),
            updated_by: Set(actor.user_id.clone()),
            ..Default::default()
        };
        let blog = self.blog_repo.create(&txn, model).await?;

        self.stats_repo
            .increment(&txn, &actor.user_id, StatCounter::TotalPosts)
            .await?;

        if let Some(source_id) = &repost_of {
            self.blog_repo
                .adjust(&txn, source_id, BlogCounter::Shares, 1)
                .await?;
            self.share_repo
                .create(
                    &txn,
                    share::ActiveModel {
                        share_id: Set(self.id_gen.generate()),
                        user_id: Set(actor.user_id.clone()),
                        ref_id: Set(source_id.clone()),
                        created_by: Set(actor.user_id.clone()),
                        updated_by: Set(actor.user_id.clone()),
                        ..Default::default()
                    },
                )
                .await?;
        } else if input.pinned {
            let start = Utc::now().fixed_offset();
            self.pinned_repo
                .create(
                    &txn,
                    pinned_blog::ActiveModel {
                        pinned_blog_id: Set(self.id_gen.generate()),
                        blog_id: Set(blog_id.clone()),
                        user_id: Set(actor.user_id.clone()),
                        start_date: Set(start),
                        end_date: Set(start + Duration::days(pin_days)),
                        created_by: Set(actor.user_id.clone()),
                        updated_by: Set(actor.user_id.clone()),
                        ..Default::default()
                    },
                )
                .await?;
        }

        txn.commit().await.map_err(AppError::database)?;

        tracing::info!(blog_id = %blog.blog_id, user_id = %actor.user_id, "Blog created");
        Ok(blog)
    }

    /// Apply the non-empty fields of `input`.
    pub async fn update(
        &self,
        blog_id: &str,
        input: UpdateBlogInput,
        actor: &CurrentUser,
    ) -> AppResult<blog::Model> {
        input.validate()?;

        let blog = self
            .blog_repo
            .find_by_id(blog_id)
            .await?
            .ok_or_else(|| blog_not_found(blog_id))?;
        actor.ensure_can_manage(&blog.user_id, "blog")?;

        let mut model = blog.into_active_model();
        if let Some(title) = non_empty(input.title) {
            model.title = Set(title);
        }
        if let Some(text) = non_empty(input.text) {
            model.text = Set(text);
        }
        if let Some(url) = non_empty(input.url) {
            model.url = Set(Some(url));
        }
        if let Some(link) = non_empty(input.external_link) {
            model.external_link = Set(Some(link));
        }
        if let Some(link_title) = non_empty(input.external_link_title) {
            model.external_link_title = Set(Some(link_title));
        }
        if let Some(images) = input.images.filter(|images| !images.is_empty()) {
            model.images = Set(serde_json::json!(images));
        }
        if let Some(video) = non_empty(input.video) {
            model.video = Set(Some(video));
            model.is_reel = Set(true);
        }
        if let Some(audio) = non_empty(input.audio) {
            model.audio = Set(Some(audio));
        }
        model.updated_at = Set(Utc::now().fixed_offset());
        model.updated_by = Set(actor.user_id.clone());

        let updated = self.blog_repo.update(model).await?;
        tracing::info!(blog_id = %blog_id, "Blog updated");
        Ok(updated)
    }

    /// Delete a blog with every comment, reply, like, share, view and pin attached to it.
    ///
    /// Replies are removed one level deep; replies to replies are not reachable.
    pub async fn delete(&self, blog_id: &str, actor: &CurrentUser) -> AppResult<()> {
        let txn = self.db.begin().await.map_err(AppError::database)?;

        let blog = self
            .blog_repo
            .find_by_id_in(&txn, blog_id)
            .await?
            .ok_or_else(|| blog_not_found(blog_id))?;
        actor.ensure_can_manage(&blog.user_id, "blog")?;

        let blog_ref = [blog_id.to_string()];
        let comment_ids = self.comment_repo.ids_by_refs(&txn, &blog_ref).await?;
        let reply_ids = self.comment_repo.ids_by_refs(&txn, &comment_ids).await?;

        let comment_likes: Vec<String> = comment_ids.iter().chain(&reply_ids).cloned().collect();
        self.like_repo.delete_by_refs(&txn, &comment_likes).await?;
        self.comment_repo.delete_by_refs(&txn, &comment_ids).await?;
        self.comment_repo.delete_by_refs(&txn, &blog_ref).await?;
        self.like_repo.delete_by_refs(&txn, &blog_ref).await?;
        self.share_repo.delete_by_ref(&txn, blog_id).await?;
        self.view_repo.delete_by_ref(&txn, blog_id).await?;
        self.pinned_repo.delete_by_blog(&txn, blog_id).await?;
        self.stats_repo
            .decrement(&txn, &blog.user_id, StatCounter::TotalPosts)
            .await?;
        self.blog_repo.delete(&txn, blog_id).await?;

        txn.commit().await.map_err(AppError::database)?;

        tracing::info!(
            blog_id = %blog_id,
            comments = comment_ids.len(),
            replies = reply_ids.len(),
            "Blog deleted"
        );
        Ok(())
    }

    /// Like or unlike a blog.
    pub async fn like_blog(&self, blog_id: &str, actor: &CurrentUser) -> AppResult<LikeToggle> {
        let txn = self.db.begin().await.map_err(AppError::database)?;

        let blog = self
            .blog_repo
            .find_by_id_in(&txn, blog_id)
            .await?
            .ok_or_else(|| blog_not_found(blog_id))?;

        let toggle = toggle_like(
            &txn,
            &self.like_repo,
            &self.stats_repo,
            &self.id_gen,
            actor,
            LikeTarget::Blog {
                repo: &self.blog_repo,
                blog: &blog,
            },
        )
        .await?;

        txn.commit().await.map_err(AppError::database)?;
        Ok(toggle)
    }

    /// Likers of a blog who follow, or are followed by, the viewer.
    pub async fn find_likes_and_followers(
        &self,
        blog_id: &str,
        viewer: &CurrentUser,
    ) -> AppResult<SessionUsers> {
        self.blog_repo
            .find_by_id(blog_id)
            .await?
            .ok_or_else(|| blog_not_found(blog_id))?;

        let liker_ids = self.like_repo.user_ids_for_ref(blog_id).await?;
        let connected: Vec<String> = self
            .follow_repo
            .connected_among(&viewer.user_id, &liker_ids)
            .await?
            .into_iter()
            .collect();
        let users = self.user_repo.find_by_ids(&connected).await?;

        Ok(SessionUsers {
            session_users: users.iter().map(UserSummary::from).collect(),
        })
    }

    async fn enrich_one(&self, blog: blog::Model, viewer: &CurrentUser) -> AppResult<BlogView> {
        self.enrich(vec![blog], viewer)
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("Enrichment dropped a blog".to_string()))
    }

    /// Attach authors and the viewer's like/repost flags with one query per concern.
    async fn enrich(
        &self,
        blogs: Vec<blog::Model>,
        viewer: &CurrentUser,
    ) -> AppResult<Vec<BlogView>> {
        if blogs.is_empty() {
            return Ok(vec![]);
        }

        let mut author_ids: Vec<String> = blogs.iter().map(|b| b.user_id.clone()).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let authors: HashMap<String, UserSummary> = self
            .user_repo
            .find_by_ids(&author_ids)
            .await?
            .iter()
            .map(|u| (u.user_id.clone(), UserSummary::from(u)))
            .collect();

        let blog_ids: Vec<String> = blogs.iter().map(|b| b.blog_id.clone()).collect();
        let (liked, reposted) = match viewer.viewer_id() {
            Some(viewer_id) => (
                self.like_repo.liked_refs(viewer_id, &blog_ids).await?,
                self.share_repo.shared_refs(viewer_id, &blog_ids).await?,
            ),
            None => Default::default(),
        };

        Ok(blogs
            .into_iter()
            .map(|blog| BlogView {
                author: authors.get(&blog.user_id).cloned(),
                liked: liked.contains(&blog.blog_id),
                reposted: reposted.contains(&blog.blog_id),
                likes_count: blog.likes_count,
                reposts_count: blog.shares_count,
                comments_count: blog.comments_count,
                views_count: blog.views_count,
                blog,
            })
            .collect())
    }
}

pub(crate) fn blog_not_found(blog_id: &str) -> AppError {
    AppError::NotFound(format!("Blog with ID {blog_id} does not exist"))
}

/// `"Hello, World!"` becomes `hello-world-<last 8 id chars>`.
fn slugify(title: &str, id: &str) -> String {
    let lowered = title.to_lowercase();
    let base = SLUG_SEPARATORS.replace_all(&lowered, "-");
    let base = base.trim_matches('-');
    let base: String = base.chars().take(80).collect();
    let suffix = &id[id.len().saturating_sub(8)..];

    if base.is_empty() {
        suffix.to_string()
    } else {
        format!("{}-{suffix}", base.trim_end_matches('-'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phinex_db::entities::{RoleName, like};
    use phinex_db::test_utils::fixtures;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction, Value};

    fn exec(rows: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: rows,
        }
    }

    fn actor(user_id: &str) -> CurrentUser {
        CurrentUser::from_user(
            &fixtures::user(user_id, "Ada"),
            vec![RoleName::Authenticated],
        )
    }

    fn transaction_log(service: BlogService, db: Arc<DatabaseConnection>) -> Vec<Transaction> {
        drop(service);
        Arc::try_unwrap(db).unwrap().into_transaction_log()
    }

    fn statements(log: &[Transaction]) -> Vec<String> {
        log.iter()
            .flat_map(|t| t.statements().iter().map(|s| s.sql.clone()))
            .collect()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(
            slugify("Hello, World!", "phi01hx0000000000000000abcdefgh"),
            "hello-world-abcdefgh"
        );
        assert_eq!(slugify("  ---  ", "phi0123456789"), "23456789");
        assert_eq!(slugify("Rust & Tokio 2024", "phiabcdefgh"), "rust-tokio-2024-abcdefgh");
    }

    #[tokio::test]
    async fn test_find_one_counts_view() {
        let view = view::Model {
            view_id: "phiv1".to_string(),
            user_id: None,
            ref_id: "phib1".to_string(),
            created_at: fixtures::now(),
            updated_at: fixtures::now(),
            created_by: "anonymous".to_string(),
            updated_by: "anonymous".to_string(),
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::blog("phib1", "phi1")]])
                .append_query_results([[view]])
                .append_query_results([[fixtures::user("phi1", "Ada")]])
                .append_exec_results([exec(1)])
                .into_connection(),
        );
        let service = BlogService::new(db.clone());

        let found = service
            .find_one("phib1", &CurrentUser::anonymous())
            .await
            .unwrap();

        assert_eq!(found.views_count, 1);
        assert!(!found.liked);
        assert_eq!(found.author.unwrap().full_name, "Ada");

        let sql = statements(&transaction_log(service, db));
        assert!(sql.iter().any(|s| s.contains(r#""views_count" = "views_count" + $1"#)));
        assert!(sql.iter().any(|s| s.starts_with(r#"INSERT INTO "views""#)));
    }

    #[tokio::test]
    async fn test_find_one_missing_blog() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<blog::Model>::new()])
                .into_connection(),
        );
        let service = BlogService::new(db);

        let err = service
            .find_one("phinope", &CurrentUser::anonymous())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Blog with ID phinope does not exist");
    }

    #[tokio::test]
    async fn test_find_all_marks_viewer_likes() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => Value::BigInt(Some(2))
                }]])
                .append_query_results([[
                    fixtures::blog("phib2", "phi1"),
                    fixtures::blog("phib1", "phi1"),
                ]])
                .append_query_results([[fixtures::user("phi1", "Ada")]])
                .append_query_results([[maplit::btreemap! {
                    "ref_id" => Value::from("phib1")
                }]])
                .append_query_results([Vec::<std::collections::BTreeMap<&str, Value>>::new()])
                .into_connection(),
        );
        let service = BlogService::new(db);

        let page = service
            .find_all(Pagination::default(), BlogOrder::Newest, &actor("phiviewer"))
            .await
            .unwrap();

        assert_eq!(page.metadata.total_items, 2);
        assert_eq!(page.data.len(), 2);
        assert!(!page.data[0].liked);
        assert!(page.data[1].liked);
        assert!(!page.data[1].reposted);
    }

    #[tokio::test]
    async fn test_create_reel_with_pin() {
        let created = blog::Model {
            video: Some("https://cdn.example.com/v.mp4".to_string()),
            is_reel: true,
            ..fixtures::blog("phib1", "phi1")
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[created]])
                .append_query_results([[fixtures::pinned_blog("phib1", "phi1", 3)]])
                .append_exec_results([exec(1)])
                .into_connection(),
        );
        let service = BlogService::new(db.clone());

        let blog = service
            .create(
                CreateBlogInput {
                    title: "My reel".to_string(),
                    text: "Watch".to_string(),
                    video: Some("https://cdn.example.com/v.mp4".to_string()),
                    pinned: true,
                    pinned_number_of_days: Some(3),
                    ..Default::default()
                },
                &actor("phi1"),
            )
            .await
            .unwrap();
        assert!(blog.is_reel);

        let log = transaction_log(service, db);
        let insert = log
            .iter()
            .flat_map(|t| t.statements().iter())
            .find(|s| s.sql.starts_with(r#"INSERT INTO "blogs""#))
            .unwrap();
        assert!(insert.values.as_ref().unwrap().0.contains(&Value::Bool(Some(true))));

        let sql = statements(&log);
        assert!(sql.iter().any(|s| s.starts_with(r#"INSERT INTO "pinned_blogs""#)));
        assert!(sql.iter().any(|s| s.contains(r#""total_posts" = "total_posts" + $1"#)));
    }

    #[tokio::test]
    async fn test_create_rejects_long_pin() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = BlogService::new(db);

        let err = service
            .create(
                CreateBlogInput {
                    title: "Pinned".to_string(),
                    text: "Body".to_string(),
                    pinned: true,
                    pinned_number_of_days: Some(366),
                    ..Default::default()
                },
                &actor("phi1"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_repost_requires_source() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<blog::Model>::new()])
                .into_connection(),
        );
        let service = BlogService::new(db);

        let err = service
            .create(
                CreateBlogInput {
                    title: "Repost".to_string(),
                    text: "Look".to_string(),
                    reposted_from_blog_id: Some("phigone".to_string()),
                    ..Default::default()
                },
                &actor("phi1"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Blog with ID phigone does not exist");
    }

    #[tokio::test]
    async fn test_update_requires_owner() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::blog("phib1", "phiowner")]])
                .into_connection(),
        );
        let service = BlogService::new(db);

        let err = service
            .update(
                "phib1",
                UpdateBlogInput {
                    title: Some("Hijacked".to_string()),
                    ..Default::default()
                },
                &actor("phistranger"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::blog("phib1", "phi1")]])
                .append_query_results([[maplit::btreemap! {
                    "comment_id" => Value::from("phic1")
                }]])
                .append_query_results([[maplit::btreemap! {
                    "comment_id" => Value::from("phir1")
                }]])
                .append_exec_results([
                    exec(2),
                    exec(1),
                    exec(1),
                    exec(3),
                    exec(0),
                    exec(4),
                    exec(0),
                    exec(1),
                    exec(1),
                ])
                .into_connection(),
        );
        let service = BlogService::new(db.clone());

        service.delete("phib1", &actor("phi1")).await.unwrap();

        let sql = statements(&transaction_log(service, db));
        for table in ["likes", "comments", "shares", "views", "pinned_blogs", "blogs"] {
            let prefix = format!(r#"DELETE FROM "{table}""#);
            assert!(sql.iter().any(|s| s.starts_with(&prefix)), "no delete on {table}");
        }
        assert!(sql.iter().any(|s| s.contains(r#""total_posts" = "total_posts" - $1"#)));
    }

    #[tokio::test]
    async fn test_like_then_unlike() {
        let liked_blog = blog::Model {
            likes_count: 1,
            ..fixtures::blog("phib1", "phiowner")
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::blog("phib1", "phiowner")]])
                .append_query_results([Vec::<like::Model>::new()])
                .append_query_results([[fixtures::like("phil1", "phi1", "phib1")]])
                .append_query_results([[liked_blog]])
                .append_query_results([[fixtures::like("phil1", "phi1", "phib1")]])
                .append_exec_results([exec(1), exec(1), exec(1), exec(1), exec(1)])
                .into_connection(),
        );
        let service = BlogService::new(db);

        let first = service.like_blog("phib1", &actor("phi1")).await.unwrap();
        assert_eq!(first, LikeToggle { liked: true, likes_count: 1 });

        let second = service.like_blog("phib1", &actor("phi1")).await.unwrap();
        assert_eq!(second, LikeToggle { liked: false, likes_count: 0 });
    }

    #[tokio::test]
    async fn test_likes_and_followers() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[fixtures::blog("phib1", "phiowner")]])
                .append_query_results([[
                    maplit::btreemap! { "user_id" => Value::from("phia") },
                    maplit::btreemap! { "user_id" => Value::from("phib") },
                ]])
                .append_query_results([[fixtures::follow("phif1", "phiviewer", "phia")]])
                .append_query_results([[fixtures::user("phia", "Alice")]])
                .into_connection(),
        );
        let service = BlogService::new(db);

        let users = service
            .find_likes_and_followers("phib1", &actor("phiviewer"))
            .await
            .unwrap();
        assert_eq!(users.session_users.len(), 1);
        assert_eq!(users.session_users[0].user_id, "phia");
    }
}
