//! API endpoints.

mod auth;
mod blogs;
mod comments;
mod health;
mod subscriptions;
mod users;
mod wallets;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(blogs::feeds_router())
        .nest("/auth", auth::router())
        .nest("/blogs", blogs::router())
        .nest("/comments", comments::router())
        .nest("/users", users::router())
        .nest("/wallets", wallets::router())
        .nest("/subscriptions", subscriptions::router())
}
