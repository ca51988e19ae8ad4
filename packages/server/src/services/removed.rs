//! Removal and restore of posts and comments through the removed log.

use chrono::Utc;
use common::removable::clamp_reason;
use common::{PageRequest, RemovableKind, RemovalTarget};
use sea_orm::sea_query::LockType;
use sea_orm::*;
use tracing::info;

use crate::entity::{comment, post, removed_log};
use crate::error::AppError;
use crate::pagination::{Page, paginate};

/// Set the `removed` flag on the target row, returning its previous value.
///
/// This is the only place that knows which table backs each removable kind.
async fn swap_removed_flag<C: ConnectionTrait>(
    txn: &C,
    target: RemovalTarget,
    removed: bool,
) -> Result<bool, AppError> {
    let not_found = || AppError::NotFound(format!("{target} not found"));
    match target.kind {
        RemovableKind::Post => {
            let row = post::Entity::find_by_id(target.id)
                .lock(LockType::Update)
                .one(txn)
                .await?
                .ok_or_else(not_found)?;
            let previous = row.removed;
            if previous != removed {
                let mut active: post::ActiveModel = row.into();
                active.removed = Set(removed);
                active.update(txn).await?;
            }
            Ok(previous)
        }
        RemovableKind::Comment => {
            let row = comment::Entity::find_by_id(target.id)
                .lock(LockType::Update)
                .one(txn)
                .await?
                .ok_or_else(not_found)?;
            let previous = row.removed;
            if previous != removed {
                let mut active: comment::ActiveModel = row.into();
                active.removed = Set(removed);
                active.update(txn).await?;
            }
            Ok(previous)
        }
    }
}

/// Flag the target removed and write its log entry.
pub async fn remove(
    db: &DatabaseConnection,
    target: RemovalTarget,
    moderator: i32,
    reason: &str,
) -> Result<removed_log::Model, AppError> {
    let txn = db.begin().await?;

    if swap_removed_flag(&txn, target, true).await? {
        return Err(AppError::Conflict(format!("{target} is already removed")));
    }

    let entry = removed_log::ActiveModel {
        entity_type: Set(target.kind),
        entity_id: Set(target.id),
        removed_by: Set(Some(moderator)),
        reason: Set(clamp_reason(reason)),
        date: Set(Utc::now()),
        ..Default::default()
    };
    let entry = match entry.insert(&txn).await {
        Ok(entry) => entry,
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(AppError::Conflict(format!("{target} is already removed")));
        }
        Err(e) => return Err(e.into()),
    };

    txn.commit().await?;

    info!(
        kind = %target.kind,
        entity_id = target.id,
        log_id = entry.id,
        moderator,
        "Removed entity"
    );
    Ok(entry)
}

/// Clear the removed flag and delete the log entry.
pub async fn restore(db: &DatabaseConnection, target: RemovalTarget) -> Result<(), AppError> {
    let txn = db.begin().await?;

    let was_removed = swap_removed_flag(&txn, target, false).await?;
    let deleted = removed_log::Entity::delete_many()
        .filter(removed_log::Column::EntityType.eq(target.kind))
        .filter(removed_log::Column::EntityId.eq(target.id))
        .exec(&txn)
        .await?;

    if !was_removed && deleted.rows_affected == 0 {
        return Err(AppError::Conflict(format!("{target} is not removed")));
    }

    txn.commit().await?;

    info!(kind = %target.kind, entity_id = target.id, "Restored entity");
    Ok(())
}

/// Browse the removed log, optionally restricted to one kind.
pub async fn browse<C: ConnectionTrait>(
    db: &C,
    kind: Option<RemovableKind>,
    req: &PageRequest,
) -> Result<Page<removed_log::Model>, DbErr> {
    let mut select = removed_log::Entity::find();
    if let Some(kind) = kind {
        select = select.filter(removed_log::Column::EntityType.eq(kind));
    }
    paginate(db, select, req).await
}
