use common::RemovableKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Moderation record for a removed post or comment. Deleted on restore.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "removed_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub entity_type: RemovableKind,
    pub entity_id: i32,

    pub removed_by: Option<i32>,
    #[sea_orm(belongs_to, from = "removed_by", to = "id", on_delete = "SetNull")]
    pub moderator: Option<super::user::Entity>,

    pub reason: String,
    pub date: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
