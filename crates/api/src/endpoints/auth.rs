//! Token issuance endpoints.

use axum::{Json, Router, extract::State, routing::post};
use phinex_common::AppResult;
use phinex_core::{GetTokenInput, LoginInput, TokenResponse};

use crate::middleware::AppState;

/// Issue a token for a verified user by email.
async fn token(
    State(state): State<AppState>,
    Json(input): Json<GetTokenInput>,
) -> AppResult<Json<TokenResponse>> {
    let response = state.auth_service.get_token_by_email(input).await?;
    Ok(Json(response))
}

/// Issue a token after checking email and password.
async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<TokenResponse>> {
    let response = state.auth_service.login(input).await?;
    Ok(Json(response))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/token", post(token))
        .route("/login", post(login))
}
