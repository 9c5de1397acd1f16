//! Response shapes assembled by the services.

use phinex_db::entities::{blog, comment, subscription, user, users_stats};
use serde::Serialize;

/// Public summary of a user attached to blogs and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub user_id: String,
    pub full_name: String,
    pub profile_image: Option<String>,
    pub email: String,
    pub verified: bool,
}

impl From<&user::Model> for UserSummary {
    fn from(user: &user::Model) -> Self {
        Self {
            user_id: user.user_id.clone(),
            full_name: user.full_name.clone(),
            profile_image: user.profile_image.clone(),
            email: user.email.clone(),
            verified: user.verified,
        }
    }
}

/// A blog together with its author and the viewer's relation to it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogView {
    pub blog: blog::Model,
    pub author: Option<UserSummary>,
    pub liked: bool,
    pub reposted: bool,
    pub likes_count: i32,
    pub reposts_count: i32,
    pub comments_count: i32,
    pub views_count: i32,
}

/// A comment or reply together with its author and the viewer's like.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub comment: comment::Model,
    pub author: Option<UserSummary>,
    pub replies_count: i32,
    pub likes_count: i32,
    pub liked: bool,
}

/// A user profile with counters and whether the viewer follows them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[serde(flatten)]
    pub user: user::Model,
    pub stats: Option<users_stats::Model>,
    pub following: bool,
}

/// Outcome of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggle {
    pub liked: bool,
    pub likes_count: i32,
}

/// Outcome of a follow toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FollowToggle {
    pub followed: bool,
}

/// Likers of a blog who share a follow edge with the viewer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUsers {
    pub session_users: Vec<UserSummary>,
}

/// An active subscription with the subscriber's summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberView {
    pub subscription: subscription::Model,
    pub subscriber: Option<UserSummary>,
}
