//! Business logic services.

#![allow(missing_docs)]

pub mod auth;
pub mod blog;
pub mod comment;
pub mod dto;
mod likes;
pub mod password;
pub mod role;
pub mod subscription;
pub mod user;
pub mod wallet;

pub use auth::{
    AuthService, Claims, CurrentUser, GetTokenInput, LoginInput, TOKEN_VERSION, TokenResponse,
};
pub use blog::{BlogService, CreateBlogInput, UpdateBlogInput};
pub use comment::{CommentService, CreateCommentInput, UpdateCommentInput};
pub use dto::{
    BlogView, CommentView, FollowToggle, LikeToggle, SessionUsers, SubscriberView, UserSummary,
    UserView,
};
pub use role::{GrantRoleInput, RoleService, UserRoles};
pub use subscription::SubscriptionService;
pub use user::{
    CreateUserInput, FollowInput, UpdateStatusInput, UpdateUserInput, UserService,
    normalize_search,
};
pub use wallet::{DepositInput, WalletService};

/// `None` for missing or blank strings.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
