//! Database entities.

#![allow(missing_docs)]

pub mod blog;
pub mod comment;
pub mod follow;
pub mod like;
pub mod pinned_blog;
pub mod role;
pub mod share;
pub mod subscription;
pub mod transaction;
pub mod user;
pub mod user_role;
pub mod users_stats;
pub mod view;
pub mod wallet;

pub use blog::Entity as Blog;
pub use comment::Entity as Comment;
pub use follow::Entity as Follow;
pub use like::Entity as Like;
pub use pinned_blog::Entity as PinnedBlog;
pub use role::{Entity as Role, RoleName};
pub use share::Entity as Share;
pub use subscription::Entity as Subscription;
pub use transaction::Entity as Transaction;
pub use user::{Entity as User, UserStatus};
pub use user_role::Entity as UserRole;
pub use users_stats::Entity as UsersStats;
pub use view::Entity as View;
pub use wallet::Entity as Wallet;
