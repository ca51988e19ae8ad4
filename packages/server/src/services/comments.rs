use chrono::Utc;
use common::PageRequest;
use sea_orm::*;
use tracing::info;

use crate::entity::comment;
use crate::error::AppError;
use crate::pagination::{Page, paginate};
use crate::services::posts::find_post;

pub const MAX_COMMENT_LEN: usize = 5000;

fn validate_content(content: &str) -> Result<String, AppError> {
    let content = content.trim();
    if content.is_empty() || content.chars().count() > MAX_COMMENT_LEN {
        return Err(AppError::Validation(format!(
            "Comment must be 1-{MAX_COMMENT_LEN} characters"
        )));
    }
    Ok(content.to_string())
}

pub async fn add_comment(
    db: &DatabaseConnection,
    post_id: i32,
    author: i32,
    content: &str,
) -> Result<comment::Model, AppError> {
    let content = validate_content(content)?;
    let post = find_post(db, post_id).await?;
    if post.removed {
        return Err(AppError::Conflict(format!("Post {post_id} is removed")));
    }

    let model = comment::ActiveModel {
        post_id: Set(post_id),
        author_id: Set(Some(author)),
        content: Set(content),
        removed: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(post_id, comment_id = model.id, author, "Added comment");
    Ok(model)
}

/// Visible (not removed) comments of a post.
pub async fn browse_comments(
    db: &DatabaseConnection,
    post_id: i32,
    req: &PageRequest,
) -> Result<Page<comment::Model>, AppError> {
    find_post(db, post_id).await?;
    let select = comment::Entity::find()
        .filter(comment::Column::PostId.eq(post_id))
        .filter(comment::Column::Removed.eq(false));
    Ok(paginate(db, select, req).await?)
}
