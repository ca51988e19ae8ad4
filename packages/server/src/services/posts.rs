use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use common::filter::{self, FilterDefaults};
use common::tag_name::normalize_tag_name;
use common::{PageRequest, query};
use sea_orm::sea_query::{LockType, Query as SeaQuery};
use sea_orm::*;
use tracing::{debug, info};

use crate::config::CatalogConfig;
use crate::entity::{post, post_tag, snapshot, tag};
use crate::error::AppError;
use crate::models::shared::clean_text;
use crate::pagination::{Page, paginate};
use crate::search::post_condition;
use crate::services::{snapshots, tags};

pub async fn find_post<C: ConnectionTrait>(db: &C, id: i32) -> Result<post::Model, AppError> {
    post::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {id} not found")))
}

/// Fetch a post with `SELECT ... FOR UPDATE`, serializing edits of its tag set.
pub async fn lock_post<C: ConnectionTrait>(txn: &C, id: i32) -> Result<post::Model, AppError> {
    post::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {id} not found")))
}

/// Tags attached to `post_id`, sorted by name.
pub async fn post_tags<C: ConnectionTrait>(db: &C, post_id: i32) -> Result<Vec<tag::Model>, DbErr> {
    tag::Entity::find()
        .filter(
            tag::Column::Id.in_subquery(
                SeaQuery::select()
                    .column(post_tag::Column::TagId)
                    .from(post_tag::Entity)
                    .and_where(post_tag::Column::PostId.eq(post_id))
                    .to_owned(),
            ),
        )
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await
}

/// Sorted tag names for each of `post_ids`. Posts without tags map to an empty list.
pub async fn tag_names_for<C: ConnectionTrait>(
    db: &C,
    post_ids: &[i32],
) -> Result<HashMap<i32, Vec<String>>, DbErr> {
    let mut result: HashMap<i32, Vec<String>> =
        post_ids.iter().map(|id| (*id, Vec::new())).collect();
    if post_ids.is_empty() {
        return Ok(result);
    }

    let links = post_tag::Entity::find()
        .filter(post_tag::Column::PostId.is_in(post_ids.to_vec()))
        .all(db)
        .await?;
    let tag_ids: BTreeSet<i32> = links.iter().map(|l| l.tag_id).collect();
    let names: HashMap<i32, String> = tag::Entity::find()
        .filter(tag::Column::Id.is_in(tag_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();

    for link in links {
        if let Some(name) = names.get(&link.tag_id) {
            result.entry(link.post_id).or_default().push(name.clone());
        }
    }
    for list in result.values_mut() {
        list.sort();
    }
    Ok(result)
}

/// A post is nsfw when its top-level directory is sensitive or it carries the
/// sensitive tag.
pub fn compute_nsfw(directory: Option<&str>, tag_names: &[String], catalog: &CatalogConfig) -> bool {
    let in_sensitive_dir = directory
        .and_then(|dir| dir.split('/').find(|segment| !segment.is_empty()))
        .is_some_and(|top| catalog.sensitive_dirs.iter().any(|d| d == top));
    in_sensitive_dir || tag_names.iter().any(|t| *t == catalog.sensitive_tag)
}

/// Post state after a tag-set change.
#[derive(Debug)]
pub struct TagSetChange {
    pub post: post::Model,
    /// Resulting tag names, sorted.
    pub tags: Vec<String>,
    /// `None` when the requested set equals the current one.
    pub snapshot: Option<snapshot::Model>,
}

/// Make `desired` the tag set of `post` and record a snapshot if it changed.
///
/// Must run inside a transaction that holds the post row lock, so that the
/// membership change and its snapshot commit or roll back together.
pub async fn apply_tag_set<C: ConnectionTrait>(
    txn: &C,
    catalog: &CatalogConfig,
    post: post::Model,
    desired: Vec<tag::Model>,
    actor: Option<i32>,
) -> Result<TagSetChange, AppError> {
    let current: BTreeSet<i32> = post_tag::Entity::find()
        .filter(post_tag::Column::PostId.eq(post.id))
        .all(txn)
        .await?
        .into_iter()
        .map(|l| l.tag_id)
        .collect();
    let wanted: BTreeSet<i32> = desired.iter().map(|t| t.id).collect();

    let mut names: Vec<String> = desired.into_iter().map(|t| t.name).collect();
    names.sort();
    names.dedup();

    if current == wanted {
        return Ok(TagSetChange {
            post,
            tags: names,
            snapshot: None,
        });
    }

    let stale: Vec<i32> = current.difference(&wanted).copied().collect();
    if !stale.is_empty() {
        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(post.id))
            .filter(post_tag::Column::TagId.is_in(stale))
            .exec(txn)
            .await?;
    }

    let fresh: Vec<post_tag::ActiveModel> = wanted
        .difference(&current)
        .map(|tag_id| post_tag::ActiveModel {
            post_id: Set(post.id),
            tag_id: Set(*tag_id),
        })
        .collect();
    if !fresh.is_empty() {
        post_tag::Entity::insert_many(fresh)
            .exec_without_returning(txn)
            .await?;
    }

    let nsfw = compute_nsfw(post.directory.as_deref(), &names, catalog);
    let post_id = post.id;
    let mut active: post::ActiveModel = post.into();
    active.nsfw = Set(nsfw);
    active.modified_at = Set(Some(Utc::now()));
    let post = active.update(txn).await?;

    let snapshot = snapshots::create_snapshot(txn, post_id, actor).await?;

    Ok(TagSetChange {
        post,
        tags: names,
        snapshot: Some(snapshot),
    })
}

/// Metadata of an uploaded file, as produced by the media pipeline.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub hash: String,
    pub ext: String,
    pub mime: String,
    pub size: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub directory: Option<String>,
    pub caption: Option<String>,
    pub op: Option<String>,
    pub src: Option<String>,
    pub tags: Vec<String>,
}

fn clean_directory(dir: Option<String>) -> Option<String> {
    clean_text(dir)
        .map(|d| d.trim_matches('/').to_string())
        .filter(|d| !d.is_empty())
}

fn validate_new_post(new: &NewPost) -> Result<(), AppError> {
    let hash = new.hash.trim();
    if hash.len() != 32 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::Validation("hash must be 32 hex characters".into()));
    }
    if new.ext.trim().trim_start_matches('.').is_empty() {
        return Err(AppError::Validation("ext must not be empty".into()));
    }
    if new.mime.trim().is_empty() {
        return Err(AppError::Validation("mime must not be empty".into()));
    }
    if new.size < 0 {
        return Err(AppError::Validation("size must be >= 0".into()));
    }
    if new.width.is_some_and(|w| w <= 0) || new.height.is_some_and(|h| h <= 0) {
        return Err(AppError::Validation("dimensions must be positive".into()));
    }
    Ok(())
}

/// Register a post and record its baseline snapshot.
pub async fn create_post(
    db: &DatabaseConnection,
    catalog: &CatalogConfig,
    author: i32,
    new: NewPost,
) -> Result<(post::Model, Vec<String>), AppError> {
    validate_new_post(&new)?;
    let hash = new.hash.trim().to_ascii_lowercase();

    let txn = db.begin().await?;

    let duplicate = post::Entity::find()
        .filter(post::Column::Hash.eq(hash.as_str()))
        .one(&txn)
        .await?;
    if let Some(existing) = duplicate {
        return Err(AppError::Conflict(format!(
            "File already uploaded as post {}",
            existing.id
        )));
    }

    let resolved = tags::resolve_tags(&txn, &new.tags).await?;
    let mut names: Vec<String> = resolved.iter().map(|t| t.name.clone()).collect();
    names.sort();

    let directory = clean_directory(new.directory);
    let now = Utc::now();
    let model = post::ActiveModel {
        author_id: Set(Some(author)),
        hash: Set(hash),
        ext: Set(new.ext.trim().trim_start_matches('.').to_ascii_lowercase()),
        mime: Set(new.mime.trim().to_string()),
        size: Set(new.size),
        width: Set(new.width),
        height: Set(new.height),
        nsfw: Set(compute_nsfw(directory.as_deref(), &names, catalog)),
        directory: Set(directory),
        caption: Set(clean_text(new.caption)),
        op: Set(clean_text(new.op)),
        src: Set(clean_text(new.src)),
        score: Set(0),
        removed: Set(false),
        created_at: Set(now),
        modified_at: Set(None),
        ..Default::default()
    };

    let post = match model.insert(&txn).await {
        Ok(post) => post,
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(AppError::Conflict("File already uploaded".into()));
        }
        Err(e) => return Err(e.into()),
    };

    if !resolved.is_empty() {
        let links = resolved.iter().map(|t| post_tag::ActiveModel {
            post_id: Set(post.id),
            tag_id: Set(t.id),
        });
        post_tag::Entity::insert_many(links)
            .exec_without_returning(&txn)
            .await?;
    }

    let baseline = snapshots::create_snapshot(&txn, post.id, Some(author)).await?;
    txn.commit().await?;

    info!(
        post_id = post.id,
        snapshot_id = baseline.id,
        tags = names.len(),
        "Registered post"
    );
    Ok((post, names))
}

/// Attribute edit. `Some(None)` or a blank string clears a field.
#[derive(Debug, Default)]
pub struct PostChanges {
    pub caption: Option<Option<String>>,
    pub op: Option<Option<String>>,
    pub src: Option<Option<String>>,
    pub directory: Option<Option<String>>,
}

impl PostChanges {
    fn is_empty(&self) -> bool {
        self.caption.is_none() && self.op.is_none() && self.src.is_none() && self.directory.is_none()
    }
}

pub async fn update_post(
    db: &DatabaseConnection,
    catalog: &CatalogConfig,
    id: i32,
    changes: PostChanges,
) -> Result<post::Model, AppError> {
    if changes.is_empty() {
        return find_post(db, id).await;
    }

    let txn = db.begin().await?;
    let post = lock_post(&txn, id).await?;

    let mut active: post::ActiveModel = post.clone().into();
    if let Some(caption) = changes.caption {
        active.caption = Set(clean_text(caption));
    }
    if let Some(op) = changes.op {
        active.op = Set(clean_text(op));
    }
    if let Some(src) = changes.src {
        active.src = Set(clean_text(src));
    }
    if let Some(directory) = changes.directory {
        let directory = clean_directory(directory);
        if directory != post.directory {
            let names: Vec<String> = post_tags(&txn, id)
                .await?
                .into_iter()
                .map(|t| t.name)
                .collect();
            active.nsfw = Set(compute_nsfw(directory.as_deref(), &names, catalog));
        }
        active.directory = Set(directory);
    }
    active.modified_at = Set(Some(Utc::now()));

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    info!(post_id = id, nsfw = updated.nsfw, "Updated post attributes");
    Ok(updated)
}

/// A requested change to a post's tag set.
#[derive(Debug, Clone)]
pub enum TagEdit {
    /// Make the set exactly these names.
    Replace(Vec<String>),
    /// Drop `remove` (unknown names are ignored), then add `add`.
    Modify { add: Vec<String>, remove: Vec<String> },
}

pub async fn edit_post_tags(
    db: &DatabaseConnection,
    catalog: &CatalogConfig,
    post_id: i32,
    actor: i32,
    edit: TagEdit,
) -> Result<TagSetChange, AppError> {
    let txn = db.begin().await?;
    let post = lock_post(&txn, post_id).await?;

    let desired = match edit {
        TagEdit::Replace(names) => tags::resolve_tags(&txn, &names).await?,
        TagEdit::Modify { add, remove } => {
            let dropped: BTreeSet<String> = remove
                .iter()
                .map(|raw| normalize_tag_name(raw))
                .collect();
            let mut kept: Vec<tag::Model> = post_tags(&txn, post_id)
                .await?
                .into_iter()
                .filter(|t| !dropped.contains(&t.name))
                .collect();
            for tag in tags::resolve_tags(&txn, &add).await? {
                if !kept.iter().any(|t| t.id == tag.id) {
                    kept.push(tag);
                }
            }
            kept
        }
    };

    let change = apply_tag_set(&txn, catalog, post, desired, Some(actor)).await?;
    txn.commit().await?;

    match &change.snapshot {
        Some(snapshot) => info!(
            post_id,
            snapshot_id = snapshot.id,
            tags = change.tags.len(),
            "Edited post tags"
        ),
        None => debug!(post_id, "Tag edit left the set unchanged"),
    }
    Ok(change)
}

/// Browse posts matching a search expression.
pub async fn browse_posts<C: ConnectionTrait>(
    db: &C,
    defaults: &FilterDefaults,
    terms: &str,
    req: &PageRequest,
) -> Result<Page<post::Model>, DbErr> {
    let parsed = query::parse(terms);
    let predicate = filter::compile(&parsed, defaults);
    debug!(query = %parsed, clauses = predicate.clauses.len(), "Compiled post search");

    paginate(db, post::Entity::find().filter(post_condition(&predicate)), req).await
}
