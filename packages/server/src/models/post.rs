use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, double_option};
use crate::entity::post;

/// Search terms for browse endpoints.
#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Search expression, e.g. `"blue sky" width:>1000 landscape -portrait`.
    pub terms: Option<String>,
    /// Alias of `terms`.
    pub search: Option<String>,
}

impl SearchQuery {
    pub fn terms(&self) -> &str {
        self.terms
            .as_deref()
            .or(self.search.as_deref())
            .unwrap_or_default()
    }
}

/// File metadata produced by the upload pipeline, plus the initial tags.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreatePostRequest {
    /// MD5 of the file content (hex).
    pub hash: String,
    pub ext: String,
    pub mime: String,
    pub size: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub directory: Option<String>,
    pub caption: Option<String>,
    pub op: Option<String>,
    pub src: Option<String>,
    /// Initial tag names. Entries may hold several space-separated names;
    /// any invalid name rejects the request.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Attribute edit. Absent fields are kept; `null` or a blank string clears.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdatePostRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub caption: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub op: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub src: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub directory: Option<Option<String>>,
}

/// Tag edit. `tags` replaces the whole set and excludes `add`/`remove`.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct EditTagsRequest {
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub add: Vec<String>,
    #[serde(default)]
    pub remove: Vec<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct RemoveRequest {
    /// Truncated to 150 characters.
    #[serde(default)]
    pub reason: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct VoteRequest {
    /// `1` or `-1`.
    pub value: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PostResponse {
    pub id: i32,
    pub author_id: Option<i32>,
    pub hash: String,
    pub ext: String,
    pub mime: String,
    pub size: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub directory: Option<String>,
    pub caption: Option<String>,
    pub op: Option<String>,
    pub src: Option<String>,
    pub score: i32,
    pub nsfw: bool,
    pub removed: bool,
    /// Tag names, sorted.
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl PostResponse {
    pub fn new(model: post::Model, tags: Vec<String>) -> Self {
        Self {
            id: model.id,
            author_id: model.author_id,
            hash: model.hash,
            ext: model.ext,
            mime: model.mime,
            size: model.size,
            width: model.width,
            height: model.height,
            directory: model.directory,
            caption: model.caption,
            op: model.op,
            src: model.src,
            score: model.score,
            nsfw: model.nsfw,
            removed: model.removed,
            tags,
            created_at: model.created_at,
            modified_at: model.modified_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PostListResponse {
    pub data: Vec<PostResponse>,
    pub pagination: Pagination,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TagEditResponse {
    pub post: PostResponse,
    /// Snapshot recorded by this edit; `null` when the tag set did not change.
    pub snapshot_id: Option<i32>,
}
