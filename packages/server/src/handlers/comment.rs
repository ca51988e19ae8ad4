use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::RemovalTarget;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::comment::*;
use crate::models::post::RemoveRequest;
use crate::models::removed::RemovedLogResponse;
use crate::models::shared::{PageQuery, Pagination};
use crate::services::{comments, removed};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/posts/{id}/comments",
    tag = "Comments",
    operation_id = "listComments",
    summary = "Browse a post's comments",
    description = "Removed comments are omitted. Sortable by `id` (default) or `created`.",
    params(("id" = i32, Path, description = "Post ID"), PageQuery),
    responses(
        (status = 200, description = "Page of comments", body = CommentListResponse),
        (status = 400, description = "Invalid paging (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, page), fields(id))]
pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(page): Query<PageQuery>,
) -> Result<Json<CommentListResponse>, AppError> {
    let req = page.resolve(&state.config.pagination)?;
    let page = comments::browse_comments(&state.db, id, &req).await?;
    let pagination = Pagination::from(&page);

    Ok(Json(CommentListResponse {
        data: page.items.into_iter().map(CommentResponse::from).collect(),
        pagination,
    }))
}

#[utoipa::path(
    post,
    path = "/posts/{id}/comments",
    tag = "Comments",
    operation_id = "createComment",
    summary = "Comment on a post",
    params(("id" = i32, Path, description = "Post ID")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Post is removed (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn create_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let model = comments::add_comment(&state.db, id, auth_user.user_id, &payload.content).await?;
    Ok((StatusCode::CREATED, Json(CommentResponse::from(model))))
}

#[utoipa::path(
    delete,
    path = "/comments/{id}",
    tag = "Comments",
    operation_id = "removeComment",
    summary = "Remove a comment",
    params(("id" = i32, Path, description = "Comment ID")),
    request_body = RemoveRequest,
    responses(
        (status = 200, description = "Removed log entry", body = RemovedLogResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Comment not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already removed (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn remove_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<RemoveRequest>,
) -> Result<Json<RemovedLogResponse>, AppError> {
    let entry = removed::remove(
        &state.db,
        RemovalTarget::comment(id),
        auth_user.user_id,
        &payload.reason,
    )
    .await?;
    Ok(Json(entry.into()))
}

#[utoipa::path(
    post,
    path = "/comments/{id}/restore",
    tag = "Comments",
    operation_id = "restoreComment",
    summary = "Restore a removed comment",
    params(("id" = i32, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Comment restored"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Comment not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Comment is not removed (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id))]
pub async fn restore_comment(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    removed::restore(&state.db, RemovalTarget::comment(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
