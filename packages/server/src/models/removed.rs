use chrono::{DateTime, Utc};
use common::RemovableKind;
use serde::{Deserialize, Serialize};

use super::shared::Pagination;
use crate::entity::removed_log;

#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RemovedFilterQuery {
    /// `post` or `comment`; all kinds when absent.
    pub kind: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RemovedLogResponse {
    pub id: i32,
    pub entity_type: RemovableKind,
    pub entity_id: i32,
    pub removed_by: Option<i32>,
    pub reason: String,
    pub date: DateTime<Utc>,
}

impl From<removed_log::Model> for RemovedLogResponse {
    fn from(m: removed_log::Model) -> Self {
        Self {
            id: m.id,
            entity_type: m.entity_type,
            entity_id: m.entity_id,
            removed_by: m.removed_by,
            reason: m.reason,
            date: m.date,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RemovedLogListResponse {
    pub data: Vec<RemovedLogResponse>,
    pub pagination: Pagination,
}
