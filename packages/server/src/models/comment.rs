use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::Pagination;
use crate::entity::comment;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCommentRequest {
    pub content: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CommentResponse {
    pub id: i32,
    pub post_id: i32,
    pub author_id: Option<i32>,
    pub content: String,
    pub removed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<comment::Model> for CommentResponse {
    fn from(m: comment::Model) -> Self {
        Self {
            id: m.id,
            post_id: m.post_id,
            author_id: m.author_id,
            content: m.content,
            removed: m.removed,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CommentListResponse {
    pub data: Vec<CommentResponse>,
    pub pagination: Pagination,
}
