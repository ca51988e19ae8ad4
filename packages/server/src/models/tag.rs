use chrono::{DateTime, Utc};
use common::TagType;
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, double_option};
use crate::entity::tag;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateTagRequest {
    pub name: String,
}

/// Absent fields are kept; `desc: null` clears the description.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateTagRequest {
    #[serde(rename = "type")]
    pub kind: Option<TagType>,
    #[serde(default, deserialize_with = "double_option")]
    pub desc: Option<Option<String>>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TagType,
    pub desc: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<tag::Model> for TagResponse {
    fn from(m: tag::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            kind: m.kind,
            desc: m.desc,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TagListResponse {
    pub data: Vec<TagResponse>,
    pub pagination: Pagination,
}
