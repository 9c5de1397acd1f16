//! Comment and reply endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use phinex_common::{AppResult, PageQuery, Paginated};
use phinex_core::{CommentView, CreateCommentInput, LikeToggle, UpdateCommentInput};
use phinex_db::entities::{comment, like};

use crate::{
    extractors::{Anonymous, Authenticated, Guard},
    middleware::AppState,
    response::ApiResponse,
};

async fn update(
    guard: Guard<Authenticated>,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Json(input): Json<UpdateCommentInput>,
) -> AppResult<ApiResponse<comment::Model>> {
    let comment = state
        .comment_service
        .update_comment(&comment_id, input, &guard)
        .await?;
    Ok(ApiResponse::accepted("Comment updated successfully", comment))
}

async fn delete(
    guard: Guard<Authenticated>,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state
        .comment_service
        .delete_comment(&comment_id, &guard)
        .await?;
    Ok(ApiResponse::message("Comment deleted successfully"))
}

async fn like(
    guard: Guard<Authenticated>,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<ApiResponse<LikeToggle>> {
    let toggle = state.comment_service.like_comment(&comment_id, &guard).await?;
    let message = if toggle.liked {
        "Comment liked"
    } else {
        "Comment unliked"
    };
    Ok(ApiResponse::accepted(message, toggle))
}

async fn likes(
    _guard: Guard<Anonymous>,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<Json<Vec<like::Model>>> {
    let likes = state.comment_service.find_comment_likes(&comment_id).await?;
    Ok(Json(likes))
}

async fn add_reply(
    guard: Guard<Authenticated>,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<ApiResponse<CommentView>> {
    let reply = state
        .comment_service
        .add_reply(&comment_id, input, &guard)
        .await?;
    Ok(ApiResponse::created("Reply added successfully", reply))
}

async fn replies(
    guard: Guard<Anonymous>,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<CommentView>>> {
    let page = state
        .comment_service
        .find_replies(&comment_id, query.pagination(), &guard)
        .await?;
    Ok(Json(page))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", put(update).delete(delete))
        .route("/{id}/likes", get(likes).put(like))
        .route("/{id}/replies", get(replies).post(add_reply))
}
