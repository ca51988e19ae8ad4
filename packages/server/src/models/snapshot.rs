use chrono::{DateTime, Utc};
use serde::Serialize;

use super::shared::Pagination;
use crate::entity::snapshot;
use crate::services::snapshots::TagDiff;

#[derive(Serialize, utoipa::ToSchema)]
pub struct SnapshotResponse {
    pub id: i32,
    pub post_id: i32,
    pub user_id: Option<i32>,
    /// Tag names at the time of the snapshot, sorted.
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<snapshot::Model> for SnapshotResponse {
    fn from(m: snapshot::Model) -> Self {
        Self {
            tags: m.tag_names(),
            id: m.id,
            post_id: m.post_id,
            user_id: m.user_id,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SnapshotDetailResponse {
    #[serde(flatten)]
    pub snapshot: SnapshotResponse,
    /// Predecessor id; `null` for the first snapshot of a post.
    pub previous_id: Option<i32>,
    /// Tags present here but not in the predecessor.
    pub added: Vec<String>,
    /// Tags present in the predecessor but not here.
    pub removed: Vec<String>,
}

impl SnapshotDetailResponse {
    pub fn new(snapshot: snapshot::Model, previous_id: Option<i32>, diff: TagDiff) -> Self {
        Self {
            snapshot: snapshot.into(),
            previous_id,
            added: diff.added,
            removed: diff.removed,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SnapshotListResponse {
    pub data: Vec<SnapshotResponse>,
    pub pagination: Pagination,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RevertResponse {
    /// The snapshot now describing the post: newly appended, or the latest one
    /// when the restored set was already current.
    pub snapshot: SnapshotResponse,
    pub created: bool,
}
