use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::tag;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::post::SearchQuery;
use crate::models::shared::{PageQuery, Pagination};
use crate::models::tag::*;
use crate::pagination::paginate;
use crate::services::tags;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/tags",
    tag = "Tags",
    operation_id = "listTags",
    summary = "Browse tags",
    description = "Words in `terms` match tag names by case-insensitive substring or exact name; `-word` excludes that exact name. Sortable by `id`, `name`, `type` or `created`.",
    params(PageQuery, SearchQuery),
    responses(
        (status = 200, description = "Page of tags", body = TagListResponse),
        (status = 400, description = "Invalid paging (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, page, search), fields(terms = %search.terms()))]
pub async fn list_tags(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(search): Query<SearchQuery>,
) -> Result<Json<TagListResponse>, AppError> {
    let req = page.resolve(&state.config.pagination)?;
    let select = tag::Entity::find().filter(tags::search_condition(search.terms()));

    let page = paginate(&state.db, select, &req).await?;
    let pagination = Pagination::from(&page);

    Ok(Json(TagListResponse {
        data: page.items.into_iter().map(TagResponse::from).collect(),
        pagination,
    }))
}

#[utoipa::path(
    post,
    path = "/tags",
    tag = "Tags",
    operation_id = "createTag",
    summary = "Get or create a tag",
    description = "Normalizes the name (ASCII letters, digits and `-_()`, lowercased) and returns the existing tag or a new `general` tag. Responds 201 only when the tag was created.",
    request_body = CreateTagRequest,
    responses(
        (status = 200, description = "Existing tag", body = TagResponse),
        (status = 201, description = "Tag created", body = TagResponse),
        (status = 400, description = "Invalid tag name (INVALID_TAG_NAME)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(name = %payload.name))]
pub async fn create_tag(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTagRequest>,
) -> Result<impl IntoResponse, AppError> {
    let existed = tags::find_tag(&state.db, &payload.name).await?.is_some();
    let model = tags::get_or_create(&state.db, &payload.name).await?;
    let status = if existed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(TagResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/tags/{name}",
    tag = "Tags",
    operation_id = "getTag",
    summary = "Get a tag by name",
    params(("name" = String, Path, description = "Tag name, any spelling")),
    responses(
        (status = 200, description = "Tag details", body = TagResponse),
        (status = 404, description = "Tag not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(name))]
pub async fn get_tag(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<TagResponse>, AppError> {
    let model = tags::find_tag(&state.db, &name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tag `{name}` not found")))?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/tags/{name}",
    tag = "Tags",
    operation_id = "updateTag",
    summary = "Edit tag type and description",
    params(("name" = String, Path, description = "Tag name, any spelling")),
    request_body = UpdateTagRequest,
    responses(
        (status = 200, description = "Tag updated", body = TagResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Tag not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(name))]
pub async fn update_tag(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
    AppJson(payload): AppJson<UpdateTagRequest>,
) -> Result<Json<TagResponse>, AppError> {
    let model = tags::update_tag(&state.db, &name, payload.kind, payload.desc).await?;
    Ok(Json(model.into()))
}
