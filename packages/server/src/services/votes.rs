use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::info;

use crate::entity::{post, vote};
use crate::error::AppError;
use crate::services::posts::lock_post;

/// Recompute the materialized score of a locked post from its votes.
async fn refresh_score<C: ConnectionTrait>(txn: &C, post: post::Model) -> Result<post::Model, DbErr> {
    let total: Option<i64> = vote::Entity::find()
        .select_only()
        .column_as(vote::Column::Value.sum(), "score")
        .filter(vote::Column::PostId.eq(post.id))
        .into_tuple::<Option<i64>>()
        .one(txn)
        .await?
        .flatten();
    let score = total.unwrap_or(0) as i32;

    if score == post.score {
        return Ok(post);
    }
    let mut active: post::ActiveModel = post.into();
    active.score = Set(score);
    active.update(txn).await
}

/// Cast or change the user's vote on a post.
pub async fn cast_vote(
    db: &DatabaseConnection,
    post_id: i32,
    user_id: i32,
    value: i32,
) -> Result<post::Model, AppError> {
    if value != 1 && value != -1 {
        return Err(AppError::Validation("Vote value must be 1 or -1".into()));
    }

    let txn = db.begin().await?;
    let post = lock_post(&txn, post_id).await?;

    let model = vote::ActiveModel {
        post_id: Set(post_id),
        user_id: Set(user_id),
        value: Set(value),
        created_at: Set(Utc::now()),
    };
    vote::Entity::insert(model)
        .on_conflict(
            OnConflict::columns([vote::Column::PostId, vote::Column::UserId])
                .update_columns([vote::Column::Value, vote::Column::CreatedAt])
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

    let post = refresh_score(&txn, post).await?;
    txn.commit().await?;

    info!(post_id, user_id, value, score = post.score, "Recorded vote");
    Ok(post)
}

/// Withdraw the user's vote. Clearing a missing vote is a no-op.
pub async fn clear_vote(
    db: &DatabaseConnection,
    post_id: i32,
    user_id: i32,
) -> Result<post::Model, AppError> {
    let txn = db.begin().await?;
    let post = lock_post(&txn, post_id).await?;

    let deleted = vote::Entity::delete_many()
        .filter(vote::Column::PostId.eq(post_id))
        .filter(vote::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;

    let post = refresh_score(&txn, post).await?;
    txn.commit().await?;

    if deleted.rows_affected > 0 {
        info!(post_id, user_id, score = post.score, "Cleared vote");
    }
    Ok(post)
}
