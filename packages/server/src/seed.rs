use common::TagType;
use sea_orm::sea_query::{Index, OnConflict, PostgresQueryBuilder};
use sea_orm::*;
use tracing::{info, warn};

use crate::entity::{removed_log, snapshot, tag};

/// Ensure required database indexes exist.
///
/// Schema sync cannot express composite indexes, so they are created here on
/// startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Predecessor lookup and history listing:
    // SELECT ... FROM snapshot WHERE post_id = ? AND id < ? ORDER BY id DESC
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_snapshot_post_id")
        .table(snapshot::Entity)
        .col(snapshot::Column::PostId)
        .col(snapshot::Column::Id)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => info!("Ensured index idx_snapshot_post_id exists"),
        Err(e) => warn!("Failed to create index idx_snapshot_post_id: {}", e),
    }

    // At most one log row per removed entity. Removal relies on this to
    // detect an already-removed target, so a failure here is fatal.
    let stmt = Index::create()
        .if_not_exists()
        .unique()
        .name("uq_removed_log_entity")
        .table(removed_log::Entity)
        .col(removed_log::Column::EntityType)
        .col(removed_log::Column::EntityId)
        .to_string(PostgresQueryBuilder);

    db.execute_unprepared(&stmt).await?;
    info!("Ensured index uq_removed_log_entity exists");

    Ok(())
}

/// Create the configured sensitive tag as a `meta` tag if it does not exist yet.
pub async fn ensure_sensitive_tag(db: &DatabaseConnection, name: &str) -> Result<(), DbErr> {
    let model = tag::ActiveModel {
        name: Set(name.to_string()),
        kind: Set(TagType::Meta),
        desc: Set(Some("Hidden from browse results unless searched for".into())),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = tag::Entity::insert(model)
        .on_conflict(OnConflict::column(tag::Column::Name).do_nothing().to_owned())
        .exec_without_returning(db)
        .await;

    match result {
        Ok(rows) if rows > 0 => info!(tag = name, "Seeded sensitive tag"),
        Ok(_) | Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e),
    }

    Ok(())
}
