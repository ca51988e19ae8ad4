use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use sea_orm::*;
use tracing::instrument;

use crate::entity::snapshot;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::shared::{PageQuery, Pagination};
use crate::models::snapshot::*;
use crate::pagination::paginate;
use crate::services::{posts, snapshots};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/posts/{id}/snapshots",
    tag = "Snapshots",
    operation_id = "listPostSnapshots",
    summary = "Browse a post's tag history",
    description = "Sortable by `id` (default) or `created`.",
    params(("id" = i32, Path, description = "Post ID"), PageQuery),
    responses(
        (status = 200, description = "Page of snapshots", body = SnapshotListResponse),
        (status = 400, description = "Invalid paging (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, page), fields(id))]
pub async fn list_post_snapshots(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(page): Query<PageQuery>,
) -> Result<Json<SnapshotListResponse>, AppError> {
    let req = page.resolve(&state.config.pagination)?;
    posts::find_post(&state.db, id).await?;

    let select = snapshot::Entity::find().filter(snapshot::Column::PostId.eq(id));
    let page = paginate(&state.db, select, &req).await?;
    let pagination = Pagination::from(&page);

    Ok(Json(SnapshotListResponse {
        data: page.items.into_iter().map(SnapshotResponse::from).collect(),
        pagination,
    }))
}

#[utoipa::path(
    get,
    path = "/snapshots/{id}",
    tag = "Snapshots",
    operation_id = "getSnapshot",
    summary = "Get a snapshot with its diff",
    description = "Returns the captured tag set plus the tags added and removed relative to the previous snapshot of the same post.",
    params(("id" = i32, Path, description = "Snapshot ID")),
    responses(
        (status = 200, description = "Snapshot details", body = SnapshotDetailResponse),
        (status = 404, description = "Snapshot not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_snapshot(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SnapshotDetailResponse>, AppError> {
    let model = snapshots::find_snapshot(&state.db, id).await?;
    let previous = snapshots::previous_snapshot(&state.db, &model).await?;

    let before = previous.as_ref().map(|p| p.tag_names()).unwrap_or_default();
    let diff = snapshots::diff(&before, &model.tag_names());

    Ok(Json(SnapshotDetailResponse::new(
        model,
        previous.map(|p| p.id),
        diff,
    )))
}

#[utoipa::path(
    post,
    path = "/snapshots/{id}/revert",
    tag = "Snapshots",
    operation_id = "revertSnapshot",
    summary = "Undo the change recorded by a snapshot",
    description = "Restores the tag set of the snapshot's predecessor and records it as a new snapshot. History is never rewritten. Fails with NO_EARLIER_VERSION for the first snapshot of a post. Responds 200 without appending when the restored set is already current.",
    params(("id" = i32, Path, description = "Snapshot ID")),
    responses(
        (status = 201, description = "New snapshot recorded", body = RevertResponse),
        (status = 200, description = "Tag set already matched; latest snapshot returned", body = RevertResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Snapshot not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "No predecessor (NO_EARLIER_VERSION)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn revert_snapshot(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<RevertResponse>), AppError> {
    let reverted =
        snapshots::revert(&state.db, &state.config.catalog, id, auth_user.user_id).await?;

    let status = if reverted.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(RevertResponse {
            snapshot: reverted.snapshot.into(),
            created: reverted.created,
        }),
    ))
}
