//! Snapshot store: the append-only history of each post's tag set.

use std::collections::BTreeSet;

use chrono::Utc;
use sea_orm::*;
use tracing::info;

use crate::config::CatalogConfig;
use crate::entity::snapshot;
use crate::error::AppError;
use crate::services::{posts, tags};

/// Tag names currently attached to `post_id`, sorted ascending.
pub async fn current_tag_names<C: ConnectionTrait>(
    db: &C,
    post_id: i32,
) -> Result<Vec<String>, DbErr> {
    let rows = posts::post_tags(db, post_id).await?;
    Ok(rows.into_iter().map(|t| t.name).collect())
}

/// Append a snapshot of the post's current tag membership.
pub async fn create_snapshot<C: ConnectionTrait>(
    db: &C,
    post_id: i32,
    actor: Option<i32>,
) -> Result<snapshot::Model, DbErr> {
    let names = current_tag_names(db, post_id).await?;
    let model = snapshot::ActiveModel {
        post_id: Set(post_id),
        user_id: Set(actor),
        tags: Set(serde_json::Value::from(names)),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(post_id, snapshot_id = model.id, "Recorded snapshot");
    Ok(model)
}

pub async fn find_snapshot<C: ConnectionTrait>(db: &C, id: i32) -> Result<snapshot::Model, AppError> {
    snapshot::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Snapshot {id} not found")))
}

/// Greatest-id snapshot of the same post strictly before `snapshot`.
pub async fn previous_snapshot<C: ConnectionTrait>(
    db: &C,
    snapshot: &snapshot::Model,
) -> Result<Option<snapshot::Model>, DbErr> {
    snapshot::Entity::find()
        .filter(snapshot::Column::PostId.eq(snapshot.post_id))
        .filter(snapshot::Column::Id.lt(snapshot.id))
        .order_by_desc(snapshot::Column::Id)
        .one(db)
        .await
}

pub async fn latest_snapshot<C: ConnectionTrait>(
    db: &C,
    post_id: i32,
) -> Result<Option<snapshot::Model>, DbErr> {
    snapshot::Entity::find()
        .filter(snapshot::Column::PostId.eq(post_id))
        .order_by_desc(snapshot::Column::Id)
        .one(db)
        .await
}

/// Tag-level difference between two snapshots.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TagDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

/// Compare `current` against `previous`. Both outputs are sorted.
pub fn diff(previous: &[String], current: &[String]) -> TagDiff {
    let before: BTreeSet<&String> = previous.iter().collect();
    let after: BTreeSet<&String> = current.iter().collect();
    TagDiff {
        added: after.difference(&before).map(|s| s.to_string()).collect(),
        removed: before.difference(&after).map(|s| s.to_string()).collect(),
    }
}

/// Result of a revert.
#[derive(Debug)]
pub struct Reverted {
    pub snapshot: snapshot::Model,
    /// False when the restored set was already current and nothing was appended.
    pub created: bool,
}

/// Restore the tag set recorded by the predecessor of `snapshot_id`.
///
/// History is never rewritten: the restored state is appended as a new
/// snapshot. Tags deleted since the predecessor was taken are recreated.
pub async fn revert(
    db: &DatabaseConnection,
    catalog: &CatalogConfig,
    snapshot_id: i32,
    actor: i32,
) -> Result<Reverted, AppError> {
    let txn = db.begin().await?;

    let target = find_snapshot(&txn, snapshot_id).await?;
    let post = posts::lock_post(&txn, target.post_id).await?;

    let previous = previous_snapshot(&txn, &target)
        .await?
        .ok_or(AppError::NoEarlierVersion)?;

    let restored = tags::resolve_tags(&txn, &previous.tag_names()).await?;
    let outcome = posts::apply_tag_set(&txn, catalog, post, restored, Some(actor)).await?;

    let reverted = match outcome.snapshot {
        Some(snapshot) => Reverted {
            snapshot,
            created: true,
        },
        None => {
            let snapshot = latest_snapshot(&txn, target.post_id).await?.ok_or_else(|| {
                AppError::Internal(format!("post {} has no snapshots", target.post_id))
            })?;
            Reverted {
                snapshot,
                created: false,
            }
        }
    };

    txn.commit().await?;

    info!(
        post_id = target.post_id,
        reverted = snapshot_id,
        restored_from = previous.id,
        snapshot_id = reverted.snapshot.id,
        created = reverted.created,
        "Reverted post tags"
    );

    Ok(reverted)
}
