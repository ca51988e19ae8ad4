//! Sorting and paging of filtered selects.

use common::field::PostField;
use common::{PageRequest, SortDirection};
use sea_orm::*;

use crate::entity::{comment, post, removed_log, snapshot, tag};
use crate::search::post_column;

/// An entity that can be browsed page by page.
pub trait Sortable: EntityTrait {
    /// Column for a client-supplied sort name, `None` when the name is not sortable.
    fn sort_column(name: &str) -> Option<Self::Column>;

    /// Identity column: the fallback sort key and the tie-breaker.
    fn id_column() -> Self::Column;
}

/// One page of results plus the totals needed to render pagination.
#[derive(Debug)]
pub struct Page<M> {
    pub items: Vec<M>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<M> Page<M> {
    pub fn map<N>(self, f: impl FnMut(M) -> N) -> Page<N> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

fn order(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    }
}

/// Count, sort and slice `select` according to `req`.
///
/// Unknown sort names fall back to the identity column. The identity column is
/// always appended as a tie-breaker in the same direction so pages are stable.
/// A page past the end is empty, not an error.
pub async fn paginate<E, C>(
    db: &C,
    select: Select<E>,
    req: &PageRequest,
) -> Result<Page<E::Model>, DbErr>
where
    E: Sortable,
    E::Model: Send + Sync,
    C: ConnectionTrait,
{
    let per_page = req.limit;
    let total = select.clone().paginate(db, per_page).num_items().await?;
    let total_pages = total.div_ceil(per_page);

    let sort_column = req
        .sort
        .as_deref()
        .and_then(E::sort_column)
        .unwrap_or_else(E::id_column);

    let items = select
        .order_by(sort_column, order(req.direction))
        .order_by(E::id_column(), order(req.direction))
        .offset(Some(req.offset()))
        .limit(Some(per_page))
        .all(db)
        .await?;

    Ok(Page {
        items,
        page: req.page,
        per_page,
        total,
        total_pages,
    })
}

impl Sortable for post::Entity {
    fn sort_column(name: &str) -> Option<post::Column> {
        PostField::from_name(name).map(post_column)
    }

    fn id_column() -> post::Column {
        post::Column::Id
    }
}

impl Sortable for tag::Entity {
    fn sort_column(name: &str) -> Option<tag::Column> {
        match name {
            "id" => Some(tag::Column::Id),
            "name" => Some(tag::Column::Name),
            "type" => Some(tag::Column::Kind),
            "created" => Some(tag::Column::CreatedAt),
            _ => None,
        }
    }

    fn id_column() -> tag::Column {
        tag::Column::Id
    }
}

impl Sortable for snapshot::Entity {
    fn sort_column(name: &str) -> Option<snapshot::Column> {
        match name {
            "id" => Some(snapshot::Column::Id),
            "created" => Some(snapshot::Column::CreatedAt),
            _ => None,
        }
    }

    fn id_column() -> snapshot::Column {
        snapshot::Column::Id
    }
}

impl Sortable for comment::Entity {
    fn sort_column(name: &str) -> Option<comment::Column> {
        match name {
            "id" => Some(comment::Column::Id),
            "created" => Some(comment::Column::CreatedAt),
            _ => None,
        }
    }

    fn id_column() -> comment::Column {
        comment::Column::Id
    }
}

impl Sortable for removed_log::Entity {
    fn sort_column(name: &str) -> Option<removed_log::Column> {
        match name {
            "id" => Some(removed_log::Column::Id),
            "date" => Some(removed_log::Column::Date),
            "entity_id" => Some(removed_log::Column::EntityId),
            _ => None,
        }
    }

    fn id_column() -> removed_log::Column {
        removed_log::Column::Id
    }
}
