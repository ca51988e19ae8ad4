use axum::Json;
use axum::extract::{Query, State};
use common::RemovableKind;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::models::removed::*;
use crate::models::shared::{PageQuery, Pagination};
use crate::services::removed;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/removed",
    tag = "Moderation",
    operation_id = "listRemoved",
    summary = "Browse the removed log",
    description = "Sortable by `id` (default), `date` or `entity_id`. Filter by `kind` (`post` or `comment`).",
    params(PageQuery, RemovedFilterQuery),
    responses(
        (status = 200, description = "Page of removed log entries", body = RemovedLogListResponse),
        (status = 400, description = "Invalid paging or kind (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, page, filter), fields(kind = ?filter.kind))]
pub async fn list_removed(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<RemovedFilterQuery>,
) -> Result<Json<RemovedLogListResponse>, AppError> {
    let req = page.resolve(&state.config.pagination)?;
    let kind = filter
        .kind
        .as_deref()
        .map(str::parse::<RemovableKind>)
        .transpose()
        .map_err(AppError::Validation)?;

    let page = removed::browse(&state.db, kind, &req).await?;
    let pagination = Pagination::from(&page);

    Ok(Json(RemovedLogListResponse {
        data: page.items.into_iter().map(RemovedLogResponse::from).collect(),
        pagination,
    }))
}
