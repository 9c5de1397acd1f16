//! HTTP API layer for phinex.
//!
//! - **Endpoints**: blogs, comments, users, wallets and subscriptions
//! - **Extractors**: role guards and typed list queries
//! - **State**: the services shared by every handler
//!
//! Built on Axum 0.8. The server binary wraps the router in the tower-http stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
