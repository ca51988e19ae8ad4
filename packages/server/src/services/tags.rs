//! Tag resolver: lookup and idempotent creation of tags by normalized name.

use std::collections::BTreeSet;

use chrono::Utc;
use common::TagType;
use common::tag_name::{normalize_tag_name, validate_tag_name};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr, OnConflict};
use sea_orm::*;
use tracing::{debug, info};

use crate::entity::tag;
use crate::error::AppError;
use crate::models::shared::{clean_text, escape_like};

async fn find_by_name<C: ConnectionTrait>(db: &C, name: &str) -> Result<Option<tag::Model>, DbErr> {
    tag::Entity::find()
        .filter(tag::Column::Name.eq(name))
        .one(db)
        .await
}

/// Look up a tag by any spelling of its name. A miss is not an error.
pub async fn find_tag<C: ConnectionTrait>(db: &C, raw: &str) -> Result<Option<tag::Model>, DbErr> {
    let name = normalize_tag_name(raw);
    if name.is_empty() {
        return Ok(None);
    }
    find_by_name(db, &name).await
}

/// Return the tag named `raw` after normalization, creating it if needed.
///
/// A concurrent creator winning the insert race is not an error: the insert
/// becomes a no-op and the winner's row is returned.
pub async fn get_or_create<C: ConnectionTrait>(db: &C, raw: &str) -> Result<tag::Model, AppError> {
    let name = validate_tag_name(raw)?;
    get_or_create_by_name(db, name).await
}

async fn get_or_create_by_name<C: ConnectionTrait>(
    db: &C,
    name: String,
) -> Result<tag::Model, AppError> {
    if let Some(existing) = find_by_name(db, &name).await? {
        return Ok(existing);
    }

    let model = tag::ActiveModel {
        name: Set(name.clone()),
        kind: Set(TagType::General),
        desc: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let result = tag::Entity::insert(model)
        .on_conflict(OnConflict::column(tag::Column::Name).do_nothing().to_owned())
        .exec_without_returning(db)
        .await;

    match result {
        Ok(rows) if rows > 0 => info!(tag = %name, "Created tag"),
        Ok(_) | Err(DbErr::RecordNotInserted) => {
            debug!(tag = %name, "Tag was created concurrently, re-fetching");
        }
        Err(e) => return Err(e.into()),
    }

    find_by_name(db, &name)
        .await?
        .ok_or_else(|| AppError::Internal(format!("tag `{name}` vanished after insert")))
}

/// Resolve a batch of names, creating the missing ones.
///
/// Every name is validated before anything is written, so the first invalid
/// name aborts the batch. Tags are then created in ascending name order:
/// transactions racing on overlapping batches take the unique-index locks in
/// the same order and cannot deadlock.
pub async fn resolve_tags<C: ConnectionTrait>(
    db: &C,
    names: &[String],
) -> Result<Vec<tag::Model>, AppError> {
    let ordered = names
        .iter()
        .map(String::as_str)
        .map(validate_tag_name)
        .collect::<Result<BTreeSet<_>, _>>()?;

    let mut tags = Vec::with_capacity(ordered.len());
    for name in ordered {
        tags.push(get_or_create_by_name(db, name).await?);
    }
    Ok(tags)
}

/// Tag browse filter.
///
/// Positive words match a case-insensitive substring or the exact name (any of
/// them may match); `-word` excludes that exact name.
pub fn search_condition(terms: &str) -> Condition {
    let mut include = Condition::any();
    let mut exclude = Condition::all();
    let mut has_include = false;

    for word in terms.split_whitespace() {
        if let Some(negated) = word.strip_prefix('-') {
            let name = normalize_tag_name(negated);
            if !name.is_empty() {
                exclude = exclude.add(tag::Column::Name.ne(name));
            }
            continue;
        }

        let name = normalize_tag_name(word);
        if name.is_empty() {
            continue;
        }
        has_include = true;
        let term = escape_like(&name);
        include = include
            .add(
                Expr::expr(Func::lower(Expr::col(tag::Column::Name)))
                    .like(LikeExpr::new(format!("%{term}%")).escape('\\')),
            )
            .add(tag::Column::Name.eq(name));
    }

    if has_include {
        exclude.add(include)
    } else {
        exclude
    }
}

/// Edit tag metadata. The name itself is immutable.
pub async fn update_tag(
    db: &DatabaseConnection,
    raw: &str,
    kind: Option<TagType>,
    desc: Option<Option<String>>,
) -> Result<tag::Model, AppError> {
    let existing = find_tag(db, raw)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tag `{raw}` not found")))?;

    if kind.is_none() && desc.is_none() {
        return Ok(existing);
    }

    let mut active: tag::ActiveModel = existing.into();
    if let Some(kind) = kind {
        active.kind = Set(kind);
    }
    if let Some(desc) = desc {
        active.desc = Set(clean_text(desc));
    }
    let model = active.update(db).await?;
    info!(tag = %model.name, kind = %model.kind, "Updated tag");
    Ok(model)
}
