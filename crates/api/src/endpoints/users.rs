//! User, follow and role administration endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use phinex_common::{AppResult, PageQuery, Paginated};
use phinex_core::{
    BlogView, CreateUserInput, FollowInput, FollowToggle, GrantRoleInput, UpdateStatusInput,
    UpdateUserInput, UserRoles, UserView,
};
use phinex_db::entities::{RoleName, subscription, user, user_role};

use crate::{
    extractors::{Admin, Anonymous, Authenticated, Guard, SuperAdmin, UserListQuery},
    middleware::AppState,
    response::ApiResponse,
};

/// Register a user. Open to anonymous callers.
async fn create(
    guard: Guard<Anonymous>,
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<ApiResponse<user::Model>> {
    let user = state.user_service.create_user(input, &guard).await?;
    Ok(ApiResponse::created("User created successfully", user))
}

async fn list(
    guard: Guard<Anonymous>,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<Paginated<UserView>>> {
    let page = state
        .user_service
        .find_all_users(query.pagination(), query.search.as_deref(), &guard)
        .await?;
    Ok(Json(page))
}

async fn show(
    guard: Guard<Anonymous>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserView>> {
    let user = state.user_service.find_user_by_id(&user_id, &guard).await?;
    Ok(Json(user))
}

async fn update(
    guard: Guard<Authenticated>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<ApiResponse<user::Model>> {
    let user = state
        .user_service
        .update_user(&user_id, input, &guard)
        .await?;
    Ok(ApiResponse::accepted("User updated successfully", user))
}

async fn remove(
    guard: Guard<Authenticated>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.user_service.delete_user(&user_id, &guard).await?;
    Ok(ApiResponse::message("User deleted successfully"))
}

async fn follow(
    guard: Guard<Authenticated>,
    State(state): State<AppState>,
    Json(input): Json<FollowInput>,
) -> AppResult<ApiResponse<FollowToggle>> {
    let toggle = state.user_service.follow_unfollow(input, &guard).await?;
    let message = if toggle.followed {
        "User followed"
    } else {
        "User unfollowed"
    };
    Ok(ApiResponse::accepted(message, toggle))
}

async fn followers(
    guard: Guard<Anonymous>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<Paginated<UserView>>> {
    let page = state
        .user_service
        .find_user_followers(&user_id, query.pagination(), query.search.as_deref(), &guard)
        .await?;
    Ok(Json(page))
}

async fn followings(
    guard: Guard<Anonymous>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<Paginated<UserView>>> {
    let page = state
        .user_service
        .find_user_followings(&user_id, query.pagination(), query.search.as_deref(), &guard)
        .await?;
    Ok(Json(page))
}

/// Suggestions: users `user_id` does not follow yet.
async fn unfollowings(
    guard: Guard<Anonymous>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<Paginated<UserView>>> {
    let page = state
        .user_service
        .find_users_not_following(&user_id, query.pagination(), query.search.as_deref(), &guard)
        .await?;
    Ok(Json(page))
}

async fn blogs(
    guard: Guard<Anonymous>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<BlogView>>> {
    let page = state
        .blog_service
        .find_user_blogs(&user_id, query.pagination(), &guard)
        .await?;
    Ok(Json(page))
}

async fn subscribe(
    guard: Guard<Authenticated>,
    State(state): State<AppState>,
    Path(creator_id): Path<String>,
) -> AppResult<ApiResponse<subscription::Model>> {
    let subscription = state
        .subscription_service
        .subscribe(&creator_id, &guard)
        .await?;
    Ok(ApiResponse::created("Subscribed successfully", subscription))
}

async fn update_status(
    guard: Guard<Admin>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(input): Json<UpdateStatusInput>,
) -> AppResult<ApiResponse<user::Model>> {
    let user = state
        .user_service
        .update_status(&user_id, input, &guard)
        .await?;
    Ok(ApiResponse::accepted("User status updated successfully", user))
}

async fn roles(
    _guard: Guard<Admin>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserRoles>> {
    let roles = state.role_service.list_roles(&user_id).await?;
    Ok(Json(roles))
}

async fn grant_role(
    guard: Guard<SuperAdmin>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(input): Json<GrantRoleInput>,
) -> AppResult<ApiResponse<user_role::Model>> {
    let grant = state.role_service.grant(&user_id, input, &guard).await?;
    Ok(ApiResponse::created("Role granted successfully", grant))
}

async fn revoke_role(
    guard: Guard<SuperAdmin>,
    State(state): State<AppState>,
    Path((user_id, role_name)): Path<(String, RoleName)>,
) -> AppResult<ApiResponse<()>> {
    state
        .role_service
        .revoke(&user_id, role_name, &guard)
        .await?;
    Ok(ApiResponse::message("Role revoked successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/follows", post(follow))
        .route("/{id}", get(show).put(update).delete(remove))
        .route("/{id}/followers", get(followers))
        .route("/{id}/followings", get(followings))
        .route("/{id}/unfollowings", get(unfollowings))
        .route("/{id}/blogs", get(blogs))
        .route("/{id}/subscribe", post(subscribe))
        .route("/{id}/status", put(update_status))
        .route("/{id}/roles", get(roles).post(grant_role))
        .route("/{id}/roles/{role_name}", delete(revoke_role))
}
