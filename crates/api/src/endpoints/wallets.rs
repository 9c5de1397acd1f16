//! Wallet endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use phinex_common::{AppResult, PageQuery, Paginated};
use phinex_core::DepositInput;
use phinex_db::entities::{transaction, wallet};

use crate::{
    extractors::{Authenticated, Guard, PaymentAgent},
    middleware::AppState,
    response::ApiResponse,
};

async fn me(
    guard: Guard<Authenticated>,
    State(state): State<AppState>,
) -> AppResult<Json<wallet::Model>> {
    let wallet = state.wallet_service.find_my_wallet(&guard).await?;
    Ok(Json(wallet))
}

/// The caller's ledger, newest first.
async fn transactions(
    guard: Guard<Authenticated>,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<transaction::Model>>> {
    let page = state
        .wallet_service
        .find_transactions(&guard, query.pagination())
        .await?;
    Ok(Json(page))
}

async fn deposit(
    guard: Guard<PaymentAgent>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(input): Json<DepositInput>,
) -> AppResult<ApiResponse<transaction::Model>> {
    let entry = state.wallet_service.deposit(&user_id, input, &guard).await?;
    Ok(ApiResponse::created("Deposit completed successfully", entry))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/me/transactions", get(transactions))
        .route("/{user_id}/deposits", post(deposit))
}
