use common::TagType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tag")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Normalized name, see `common::tag_name`.
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_name = "type")]
    pub kind: TagType,
    pub desc: Option<String>,

    #[sea_orm(has_many, via = "post_tag")]
    pub posts: HasMany<super::post::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
