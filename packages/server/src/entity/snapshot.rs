use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One entry in a post's append-only tag history.
///
/// Rows are only ever inserted; they disappear solely through the cascade
/// from their post.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "snapshot")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub post_id: i32,
    #[sea_orm(belongs_to, from = "post_id", to = "id", on_delete = "Cascade")]
    pub post: HasOne<super::post::Entity>,

    /// Actor; NULL if the account was deleted.
    pub user_id: Option<i32>,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "SetNull")]
    pub user: Option<super::user::Entity>,

    /// Tag names sorted ascending, as a JSON array of strings.
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: serde_json::Value,

    pub created_at: DateTimeUtc,
}

impl Model {
    /// Captured tag names. Non-string entries are skipped.
    pub fn tag_names(&self) -> Vec<String> {
        self.tags
            .as_array()
            .map(|names| {
                names
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl ActiveModelBehavior for ActiveModel {}
