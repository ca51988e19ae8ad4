use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// NULL once the uploader's account is gone.
    pub author_id: Option<i32>,
    #[sea_orm(belongs_to, from = "author_id", to = "id", on_delete = "SetNull")]
    pub author: Option<super::user::Entity>,

    /// MD5 of the file content.
    #[sea_orm(unique)]
    pub hash: String,
    pub ext: String,
    pub mime: String,
    pub size: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,

    /// Storage sub-directory; its first segment decides sensitive-directory membership.
    pub directory: Option<String>,
    pub caption: Option<String>,
    pub op: Option<String>,
    pub src: Option<String>,

    /// Sum of vote values, recomputed whenever a vote changes.
    pub score: i32,
    /// Derived from directory and tag membership, recomputed on either change.
    pub nsfw: bool,
    #[sea_orm(indexed)]
    pub removed: bool,

    #[sea_orm(has_many, via = "post_tag")]
    pub tags: HasMany<super::tag::Entity>,

    pub created_at: DateTimeUtc,
    pub modified_at: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}
