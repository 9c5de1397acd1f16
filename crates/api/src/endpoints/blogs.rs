//! Blog endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use phinex_common::{AppResult, PageQuery, Paginated};
use phinex_core::{
    BlogView, CommentView, CreateBlogInput, CreateCommentInput, LikeToggle, SessionUsers,
    UpdateBlogInput,
};
use phinex_db::entities::blog;

use crate::{
    extractors::{Anonymous, Authenticated, BlogListQuery, Guard},
    middleware::AppState,
    response::ApiResponse,
};

async fn create(
    guard: Guard<Authenticated>,
    State(state): State<AppState>,
    Json(input): Json<CreateBlogInput>,
) -> AppResult<ApiResponse<blog::Model>> {
    let blog = state.blog_service.create(input, &guard).await?;
    Ok(ApiResponse::created("Blog created successfully", blog))
}

async fn list(
    guard: Guard<Anonymous>,
    State(state): State<AppState>,
    Query(query): Query<BlogListQuery>,
) -> AppResult<Json<Paginated<BlogView>>> {
    let page = state
        .blog_service
        .find_all(query.pagination(), query.order, &guard)
        .await?;
    Ok(Json(page))
}

/// Fetching a blog counts as a view.
async fn show(
    guard: Guard<Anonymous>,
    State(state): State<AppState>,
    Path(blog_id): Path<String>,
) -> AppResult<Json<BlogView>> {
    let blog = state.blog_service.find_one(&blog_id, &guard).await?;
    Ok(Json(blog))
}

async fn update(
    guard: Guard<Authenticated>,
    State(state): State<AppState>,
    Path(blog_id): Path<String>,
    Json(input): Json<UpdateBlogInput>,
) -> AppResult<ApiResponse<blog::Model>> {
    let blog = state.blog_service.update(&blog_id, input, &guard).await?;
    Ok(ApiResponse::accepted("Blog updated successfully", blog))
}

async fn delete(
    guard: Guard<Authenticated>,
    State(state): State<AppState>,
    Path(blog_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.blog_service.delete(&blog_id, &guard).await?;
    Ok(ApiResponse::message("Blog deleted successfully"))
}

async fn like(
    guard: Guard<Authenticated>,
    State(state): State<AppState>,
    Path(blog_id): Path<String>,
) -> AppResult<ApiResponse<LikeToggle>> {
    let toggle = state.blog_service.like_blog(&blog_id, &guard).await?;
    let message = if toggle.liked { "Blog liked" } else { "Blog unliked" };
    Ok(ApiResponse::accepted(message, toggle))
}

/// Likers the caller follows or is followed by.
async fn likes_and_followers(
    guard: Guard<Authenticated>,
    State(state): State<AppState>,
    Path(blog_id): Path<String>,
) -> AppResult<Json<SessionUsers>> {
    let users = state
        .blog_service
        .find_likes_and_followers(&blog_id, &guard)
        .await?;
    Ok(Json(users))
}

async fn add_comment(
    guard: Guard<Authenticated>,
    State(state): State<AppState>,
    Path(blog_id): Path<String>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<ApiResponse<CommentView>> {
    let comment = state
        .comment_service
        .add_comment(&blog_id, input, &guard)
        .await?;
    Ok(ApiResponse::created("Comment added successfully", comment))
}

async fn comments(
    guard: Guard<Anonymous>,
    State(state): State<AppState>,
    Path(blog_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<CommentView>>> {
    let page = state
        .comment_service
        .find_comments(&blog_id, query.pagination(), &guard)
        .await?;
    Ok(Json(page))
}

async fn pinned(
    guard: Guard<Anonymous>,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<BlogView>>> {
    let page = state
        .blog_service
        .find_pinned_blogs(query.pagination(), &guard)
        .await?;
    Ok(Json(page))
}

async fn following(
    guard: Guard<Authenticated>,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<BlogView>>> {
    let page = state
        .blog_service
        .find_following_blogs(query.pagination(), &guard)
        .await?;
    Ok(Json(page))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).put(update).delete(delete))
        .route("/{id}/likes", put(like))
        .route("/{id}/follows/likes", get(likes_and_followers))
        .route("/{id}/comments", get(comments).post(add_comment))
}

/// Feeds that live outside `/blogs`.
pub fn feeds_router() -> Router<AppState> {
    Router::new()
        .route("/pinned-blogs", get(pinned))
        .route("/following-blogs", get(following))
}
