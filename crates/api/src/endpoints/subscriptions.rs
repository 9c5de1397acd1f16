//! Subscription endpoints. Subscribing lives under `/users/{id}/subscribe`.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use phinex_common::{AppResult, PageQuery, Paginated};
use phinex_core::SubscriberView;

use crate::{
    extractors::{BusinessOwner, Guard},
    middleware::AppState,
};

/// Active subscribers of the calling creator.
async fn subscribers(
    guard: Guard<BusinessOwner>,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<SubscriberView>>> {
    let page = state
        .subscription_service
        .find_subscribers(&guard, query.pagination())
        .await?;
    Ok(Json(page))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/subscribers", get(subscribers))
}
