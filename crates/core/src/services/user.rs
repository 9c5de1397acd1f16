//! User accounts, profiles and the follow graph.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use phinex_common::{
    AppError, AppResult, IdGenerator, Paginated, Pagination, config::default_currency,
};
use phinex_db::{
    entities::{RoleName, UserStatus, follow, user, user_role, users_stats, wallet},
    repositories::{
        FollowRepository, RoleRepository, StatCounter, UserRepository, UsersStatsRepository,
        WalletRepository,
        follow::{followers_of, followings_of},
        user::search_condition,
    },
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, IntoActiveModel, Set, TransactionTrait};
use serde::Deserialize;
use validator::Validate;

use super::auth::CurrentUser;
use super::dto::{FollowToggle, UserView};
use super::non_empty;
use super::password::hash_password;
use super::wallet::allocate_account_number;

/// Longest search string that is applied.
pub const MAX_SEARCH_LENGTH: usize = 100;

/// Followers needed before an account is marked verified.
pub const VERIFIED_FOLLOWER_THRESHOLD: i32 = 30;

/// Input for `POST /users`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(length(max = 80))]
    pub user_name: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<String>,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
}

/// Partial profile update. Empty strings leave the column unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(length(max = 80))]
    pub user_name: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 6))]
    pub password: Option<String>,
}

/// Input for `PUT /users/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusInput {
    pub status: UserStatus,
}

/// Input for `POST /users/follows`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FollowInput {
    /// Defaults to the caller.
    pub follower_id: Option<String>,
    #[validate(length(min = 1))]
    pub following_id: String,
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
    user_repo: UserRepository,
    stats_repo: UsersStatsRepository,
    follow_repo: FollowRepository,
    role_repo: RoleRepository,
    wallet_repo: WalletRepository,
    wallet_currency: String,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            user_repo: UserRepository::new(db.clone()),
            stats_repo: UsersStatsRepository::new(db.clone()),
            follow_repo: FollowRepository::new(db.clone()),
            role_repo: RoleRepository::new(db.clone()),
            wallet_repo: WalletRepository::new(db.clone()),
            wallet_currency: default_currency(),
            id_gen: IdGenerator::new(),
            db,
        }
    }

    /// Currency given to wallets opened at registration.
    #[must_use]
    pub fn with_wallet_currency(mut self, currency: impl Into<String>) -> Self {
        self.wallet_currency = currency.into();
        self
    }

    /// Register a user with its stats row, wallet and the `Authenticated` role.
    pub async fn create_user(
        &self,
        input: CreateUserInput,
        actor: &CurrentUser,
    ) -> AppResult<user::Model> {
        input.validate()?;

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(email_taken());
        }

        let password_hash = hash_password(&input.password)?;
        let user_id = self.id_gen.generate();
        let audit = actor.audit_id();

        let txn = self.db.begin().await.map_err(AppError::database)?;

        let user = self
            .user_repo
            .create(
                &txn,
                user::ActiveModel {
                    user_id: Set(user_id.clone()),
                    first_name: Set(non_empty(input.first_name)),
                    middle_name: Set(non_empty(input.middle_name)),
                    last_name: Set(non_empty(input.last_name)),
                    full_name: Set(input.full_name),
                    user_name: Set(non_empty(input.user_name)),
                    profile_image: Set(non_empty(input.profile_image)),
                    bio: Set(non_empty(input.bio)),
                    phone_number: Set(non_empty(input.phone_number)),
                    status: Set(UserStatus::Active),
                    password: Set(password_hash),
                    gender: Set(non_empty(input.gender)),
                    dob: Set(non_empty(input.dob)),
                    email: Set(input.email),
                    verified: Set(false),
                    email_is_verified: Set(false),
                    phone_number_is_verified: Set(false),
                    created_by: Set(audit.clone()),
                    updated_by: Set(audit.clone()),
                    ..Default::default()
                },
            )
            .await
            .map_err(|err| match err {
                AppError::Conflict(_) => email_taken(),
                other => other,
            })?;

        self.stats_repo
            .create(
                &txn,
                users_stats::ActiveModel {
                    user_stats_id: Set(self.id_gen.generate()),
                    user_id: Set(user_id.clone()),
                    created_by: Set(audit.clone()),
                    updated_by: Set(audit.clone()),
                    ..Default::default()
                },
            )
            .await?;

        let account_number = allocate_account_number(&txn, &self.wallet_repo).await?;
        self.wallet_repo
            .create(
                &txn,
                wallet::ActiveModel {
                    wallet_id: Set(self.id_gen.generate()),
                    account_number: Set(account_number),
                    user_id: Set(user_id.clone()),
                    balance: Set(Decimal::ZERO),
                    currency: Set(self.wallet_currency.clone()),
                    is_active: Set(true),
                    created_by: Set(audit.clone()),
                    updated_by: Set(audit.clone()),
                    ..Default::default()
                },
            )
            .await?;

        let role = self
            .role_repo
            .find_by_name(&txn, RoleName::Authenticated)
            .await?
            .ok_or_else(|| AppError::Internal("Role Authenticated is not seeded".to_string()))?;
        self.role_repo
            .create_grant(
                &txn,
                user_role::ActiveModel {
                    user_role_id: Set(self.id_gen.generate()),
                    user_id: Set(user_id.clone()),
                    role_id: Set(role.role_id),
                    created_by: Set(audit.clone()),
                    updated_by: Set(audit),
                    ..Default::default()
                },
            )
            .await?;

        txn.commit().await.map_err(AppError::database)?;

        tracing::info!(user_id = %user.user_id, "User created");
        Ok(user)
    }

    /// Every user matching `search`, in random order.
    pub async fn find_all_users(
        &self,
        pagination: Pagination,
        search: Option<&str>,
        viewer: &CurrentUser,
    ) -> AppResult<Paginated<UserView>> {
        let condition = Condition::all().add_option(normalize_search(search).map(search_condition));
        self.list(condition, pagination, viewer).await
    }

    /// One user with counters.
    pub async fn find_user_by_id(&self, user_id: &str, viewer: &CurrentUser) -> AppResult<UserView> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(user_not_found)?;
        self.enrich(vec![user], viewer)
            .await?
            .pop()
            .ok_or_else(user_not_found)
    }

    /// Update profile fields. Self or Admin-or-higher.
    pub async fn update_user(
        &self,
        user_id: &str,
        input: UpdateUserInput,
        actor: &CurrentUser,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(user_not_found)?;
        actor.ensure_can_manage(&user.user_id, "user")?;

        let new_email = non_empty(input.email).filter(|email| *email != user.email);
        if let Some(email) = &new_email {
            if self.user_repo.find_by_email(email).await?.is_some() {
                return Err(email_taken());
            }
        }

        let mut model = user.into_active_model();
        if let Some(full_name) = non_empty(input.full_name) {
            model.full_name = Set(full_name);
        }
        if let Some(first_name) = non_empty(input.first_name) {
            model.first_name = Set(Some(first_name));
        }
        if let Some(last_name) = non_empty(input.last_name) {
            model.last_name = Set(Some(last_name));
        }
        if let Some(user_name) = non_empty(input.user_name) {
            model.user_name = Set(Some(user_name));
        }
        if let Some(bio) = non_empty(input.bio) {
            model.bio = Set(Some(bio));
        }
        if let Some(image) = non_empty(input.profile_image) {
            model.profile_image = Set(Some(image));
        }
        if let Some(phone) = non_empty(input.phone_number) {
            model.phone_number = Set(Some(phone));
        }
        if let Some(gender) = non_empty(input.gender) {
            model.gender = Set(Some(gender));
        }
        if let Some(dob) = non_empty(input.dob) {
            model.dob = Set(Some(dob));
        }
        if let Some(email) = new_email {
            model.email = Set(email);
        }
        if let Some(password) = non_empty(input.password) {
            model.password = Set(hash_password(&password)?);
        }
        model.updated_at = Set(Utc::now().fixed_offset());
        model.updated_by = Set(actor.user_id.clone());

        let updated = self
            .user_repo
            .update(model)
            .await
            .map_err(|err| match err {
                AppError::Conflict(_) => email_taken(),
                other => other,
            })?;

        tracing::info!(user_id = %user_id, "User updated");
        Ok(updated)
    }

    /// Delete a user. Self or Admin-or-higher.
    pub async fn delete_user(&self, user_id: &str, actor: &CurrentUser) -> AppResult<()> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(user_not_found)?;
        actor.ensure_can_manage(&user.user_id, "user")?;

        self.user_repo.delete(user_id).await?;
        tracing::info!(user_id = %user_id, actor_id = %actor.user_id, "User deleted");
        Ok(())
    }

    /// Set an account's status.
    pub async fn update_status(
        &self,
        user_id: &str,
        input: UpdateStatusInput,
        actor: &CurrentUser,
    ) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(user_not_found)?;

        let mut model = user.into_active_model();
        model.status = Set(input.status);
        model.updated_at = Set(Utc::now().fixed_offset());
        model.updated_by = Set(actor.user_id.clone());
        let updated = self.user_repo.update(model).await?;

        tracing::info!(
            user_id = %user_id,
            status = input.status.as_str(),
            actor_id = %actor.user_id,
            "User status changed"
        );
        Ok(updated)
    }

    /// Follow `following_id`, or unfollow when the edge already exists.
    pub async fn follow_unfollow(
        &self,
        input: FollowInput,
        actor: &CurrentUser,
    ) -> AppResult<FollowToggle> {
        input.validate()?;

        let follower_id = non_empty(input.follower_id).unwrap_or_else(|| actor.user_id.clone());
        let following_id = input.following_id;

        if follower_id != actor.user_id && !actor.has_role(RoleName::Admin) {
            return Err(AppError::Forbidden(
                "You are not allowed to follow on behalf of another user".to_string(),
            ));
        }
        if follower_id == following_id {
            return Err(AppError::BadRequest("You cannot follow yourself".to_string()));
        }

        let txn = self.db.begin().await.map_err(AppError::database)?;

        if follower_id != actor.user_id {
            self.user_repo
                .find_by_id_in(&txn, &follower_id)
                .await?
                .ok_or_else(user_not_found)?;
        }
        self.user_repo
            .find_by_id_in(&txn, &following_id)
            .await?
            .ok_or_else(user_not_found)?;

        let followed = if let Some(edge) = self
            .follow_repo
            .find_by_pair(&txn, &follower_id, &following_id)
            .await?
        {
            self.follow_repo.delete(&txn, &edge.follow_id).await?;
            self.stats_repo
                .decrement(&txn, &following_id, StatCounter::Followers)
                .await?;
            self.stats_repo
                .decrement(&txn, &follower_id, StatCounter::Followings)
                .await?;
            false
        } else {
            self.follow_repo
                .create(
                    &txn,
                    follow::ActiveModel {
                        follow_id: Set(self.id_gen.generate()),
                        follower_id: Set(follower_id.clone()),
                        following_id: Set(following_id.clone()),
                        created_by: Set(actor.user_id.clone()),
                        updated_by: Set(actor.user_id.clone()),
                        ..Default::default()
                    },
                )
                .await?;
            self.stats_repo
                .increment(&txn, &following_id, StatCounter::Followers)
                .await?;
            self.stats_repo
                .increment(&txn, &follower_id, StatCounter::Followings)
                .await?;

            let followers = self
                .stats_repo
                .find_by_user_id_in(&txn, &following_id)
                .await?
                .map_or(0, |stats| stats.followers_count);
            if followers >= VERIFIED_FOLLOWER_THRESHOLD
                && self.user_repo.mark_verified(&txn, &following_id).await?
            {
                tracing::info!(user_id = %following_id, followers, "User verified by follower count");
            }
            true
        };

        txn.commit().await.map_err(AppError::database)?;

        tracing::info!(follower_id = %follower_id, following_id = %following_id, followed, "Follow toggled");
        Ok(FollowToggle { followed })
    }

    /// Users following `user_id`.
    pub async fn find_user_followers(
        &self,
        user_id: &str,
        pagination: Pagination,
        search: Option<&str>,
        viewer: &CurrentUser,
    ) -> AppResult<Paginated<UserView>> {
        let condition = Condition::all()
            .add(user::Column::UserId.in_subquery(followers_of(user_id)))
            .add_option(normalize_search(search).map(search_condition));
        self.list(condition, pagination, viewer).await
    }

    /// Users `user_id` follows.
    pub async fn find_user_followings(
        &self,
        user_id: &str,
        pagination: Pagination,
        search: Option<&str>,
        viewer: &CurrentUser,
    ) -> AppResult<Paginated<UserView>> {
        let condition = Condition::all()
            .add(user::Column::UserId.in_subquery(followings_of(user_id)))
            .add_option(normalize_search(search).map(search_condition));
        self.list(condition, pagination, viewer).await
    }

    /// Users other than `user_id` whom `user_id` does not follow yet.
    pub async fn find_users_not_following(
        &self,
        user_id: &str,
        pagination: Pagination,
        search: Option<&str>,
        viewer: &CurrentUser,
    ) -> AppResult<Paginated<UserView>> {
        let condition = Condition::all()
            .add(user::Column::UserId.ne(user_id))
            .add(user::Column::UserId.not_in_subquery(followings_of(user_id)))
            .add_option(normalize_search(search).map(search_condition));
        self.list(condition, pagination, viewer).await
    }

    async fn list(
        &self,
        condition: Condition,
        pagination: Pagination,
        viewer: &CurrentUser,
    ) -> AppResult<Paginated<UserView>> {
        let (users, total) = self.user_repo.find_page(condition, pagination).await?;
        let views = self.enrich(users, viewer).await?;
        Ok(Paginated::new(views, pagination, total))
    }

    /// Attach stats rows and the viewer's follow flag.
    async fn enrich(&self, users: Vec<user::Model>, viewer: &CurrentUser) -> AppResult<Vec<UserView>> {
        if users.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<String> = users.iter().map(|u| u.user_id.clone()).collect();
        let mut stats: HashMap<String, users_stats::Model> = self
            .stats_repo
            .find_by_user_ids(&ids)
            .await?
            .into_iter()
            .map(|s| (s.user_id.clone(), s))
            .collect();
        let following = match viewer.viewer_id() {
            Some(viewer_id) => self.follow_repo.followed_among(viewer_id, &ids).await?,
            None => Default::default(),
        };

        Ok(users
            .into_iter()
            .map(|user| UserView {
                stats: stats.remove(&user.user_id),
                following: following.contains(&user.user_id),
                user,
            })
            .collect())
    }
}

/// The search string to apply, if any.
///
/// Blank strings, strings over [`MAX_SEARCH_LENGTH`] characters and the literal
/// `undefined` some clients send are ignored.
#[must_use]
pub fn normalize_search(search: Option<&str>) -> Option<&str> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "undefined" && s.chars().count() <= MAX_SEARCH_LENGTH)
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

fn email_taken() -> AppError {
    AppError::Conflict("Email already exists".to_string())
}
