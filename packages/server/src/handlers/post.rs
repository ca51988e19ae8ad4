use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::RemovalTarget;
use tracing::instrument;

use crate::entity::post;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::post::*;
use crate::models::removed::RemovedLogResponse;
use crate::models::shared::{PageQuery, Pagination};
use crate::services::posts::{self, NewPost, PostChanges, TagEdit};
use crate::services::{removed, snapshots, votes};
use crate::state::AppState;

async fn post_response(state: &AppState, model: post::Model) -> Result<PostResponse, AppError> {
    let tags = snapshots::current_tag_names(&state.db, model.id).await?;
    Ok(PostResponse::new(model, tags))
}

#[utoipa::path(
    get,
    path = "/posts",
    tag = "Posts",
    operation_id = "listPosts",
    summary = "Browse posts",
    description = "Filters posts with the search grammar: `\"caption words\"`, `field:value`, `field:<value`, `field:>value`, `tag`, `-tag`, and the keywords `removed` and `no_tags`. Posts with the sensitive tag are hidden unless the query mentions it. Unknown fields and unparseable values are ignored.",
    params(PageQuery, SearchQuery),
    responses(
        (status = 200, description = "Page of posts", body = PostListResponse),
        (status = 400, description = "Invalid paging (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, page, search), fields(terms = %search.terms()))]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(search): Query<SearchQuery>,
) -> Result<Json<PostListResponse>, AppError> {
    let req = page.resolve(&state.config.pagination)?;
    let defaults = state.config.filter_defaults();

    let page = posts::browse_posts(&state.db, &defaults, search.terms(), &req).await?;
    let ids: Vec<i32> = page.items.iter().map(|p| p.id).collect();
    let mut tags = posts::tag_names_for(&state.db, &ids).await?;

    let pagination = Pagination::from(&page);
    let data = page
        .items
        .into_iter()
        .map(|p| {
            let names = tags.remove(&p.id).unwrap_or_default();
            PostResponse::new(p, names)
        })
        .collect();

    Ok(Json(PostListResponse { data, pagination }))
}

#[utoipa::path(
    post,
    path = "/posts",
    tag = "Posts",
    operation_id = "createPost",
    summary = "Register a post",
    description = "Registers an uploaded file by its metadata, attaches the initial tags and records the baseline snapshot.",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR, INVALID_TAG_NAME)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Duplicate file hash (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(hash = %payload.hash))]
pub async fn create_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new = NewPost {
        hash: payload.hash,
        ext: payload.ext,
        mime: payload.mime,
        size: payload.size,
        width: payload.width,
        height: payload.height,
        directory: payload.directory,
        caption: payload.caption,
        op: payload.op,
        src: payload.src,
        tags: payload
            .tags
            .iter()
            .flat_map(|entry| entry.split_whitespace())
            .map(str::to_string)
            .collect(),
    };
    let (model, tags) =
        posts::create_post(&state.db, &state.config.catalog, auth_user.user_id, new).await?;

    Ok((StatusCode::CREATED, Json(PostResponse::new(model, tags))))
}

#[utoipa::path(
    get,
    path = "/posts/{id}",
    tag = "Posts",
    operation_id = "getPost",
    summary = "Get a post by ID",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post details", body = PostResponse),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PostResponse>, AppError> {
    let model = posts::find_post(&state.db, id).await?;
    Ok(Json(post_response(&state, model).await?))
}

#[utoipa::path(
    patch,
    path = "/posts/{id}",
    tag = "Posts",
    operation_id = "updatePost",
    summary = "Edit post attributes",
    description = "Partially updates caption, op, src and directory. `null` or a blank string clears a field. Changing the directory recomputes the nsfw flag.",
    params(("id" = i32, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(id))]
pub async fn update_post(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    let changes = PostChanges {
        caption: payload.caption,
        op: payload.op,
        src: payload.src,
        directory: payload.directory,
    };
    let model = posts::update_post(&state.db, &state.config.catalog, id, changes).await?;
    Ok(Json(post_response(&state, model).await?))
}

#[utoipa::path(
    patch,
    path = "/posts/{id}/tags",
    tag = "Posts",
    operation_id = "editPostTags",
    summary = "Edit a post's tags",
    description = "Either replaces the tag set (`tags`) or removes then adds names (`remove`, `add`). Missing tags are created. Removing a tag the post does not carry is ignored. A snapshot is recorded only when the set changes.",
    params(("id" = i32, Path, description = "Post ID")),
    request_body = EditTagsRequest,
    responses(
        (status = 200, description = "Resulting post", body = TagEditResponse),
        (status = 400, description = "Invalid tag name (INVALID_TAG_NAME, VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn edit_post_tags(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<EditTagsRequest>,
) -> Result<Json<TagEditResponse>, AppError> {
    let edit = match payload.tags {
        Some(_) if !payload.add.is_empty() || !payload.remove.is_empty() => {
            return Err(AppError::Validation(
                "`tags` cannot be combined with `add` or `remove`".into(),
            ));
        }
        Some(tags) => TagEdit::Replace(tags),
        None => TagEdit::Modify {
            add: payload.add,
            remove: payload.remove,
        },
    };

    let change =
        posts::edit_post_tags(&state.db, &state.config.catalog, id, auth_user.user_id, edit)
            .await?;

    Ok(Json(TagEditResponse {
        snapshot_id: change.snapshot.as_ref().map(|s| s.id),
        post: PostResponse::new(change.post, change.tags),
    }))
}

#[utoipa::path(
    delete,
    path = "/posts/{id}",
    tag = "Posts",
    operation_id = "removePost",
    summary = "Remove a post",
    description = "Flags the post removed and records the reason in the removed log. Removed posts are hidden from browse results unless the query contains `removed`.",
    params(("id" = i32, Path, description = "Post ID")),
    request_body = RemoveRequest,
    responses(
        (status = 200, description = "Removed log entry", body = RemovedLogResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already removed (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn remove_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<RemoveRequest>,
) -> Result<Json<RemovedLogResponse>, AppError> {
    let entry = removed::remove(
        &state.db,
        RemovalTarget::post(id),
        auth_user.user_id,
        &payload.reason,
    )
    .await?;
    Ok(Json(entry.into()))
}

#[utoipa::path(
    post,
    path = "/posts/{id}/restore",
    tag = "Posts",
    operation_id = "restorePost",
    summary = "Restore a removed post",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post restored"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Post is not removed (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id))]
pub async fn restore_post(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    removed::restore(&state.db, RemovalTarget::post(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/posts/{id}/vote",
    tag = "Posts",
    operation_id = "castVote",
    summary = "Vote on a post",
    description = "Casts or changes the caller's vote (`1` or `-1`) and returns the post with its recomputed score.",
    params(("id" = i32, Path, description = "Post ID")),
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Post with updated score", body = PostResponse),
        (status = 400, description = "Invalid vote value (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, value = payload.value))]
pub async fn cast_vote(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<VoteRequest>,
) -> Result<Json<PostResponse>, AppError> {
    let model = votes::cast_vote(&state.db, id, auth_user.user_id, payload.value).await?;
    Ok(Json(post_response(&state, model).await?))
}

#[utoipa::path(
    delete,
    path = "/posts/{id}/vote",
    tag = "Posts",
    operation_id = "clearVote",
    summary = "Withdraw a vote",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post with updated score", body = PostResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn clear_vote(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PostResponse>, AppError> {
    let model = votes::clear_vote(&state.db, id, auth_user.user_id).await?;
    Ok(Json(post_response(&state, model).await?))
}
