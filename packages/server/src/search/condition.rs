//! Translation of a compiled [`Predicate`] into a SeaORM [`Condition`] over `post`.

use common::field::{FieldKind, FieldValue, PostField};
use common::filter::{Clause, Predicate};
use common::query::AttrOp;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr, Query as SeaQuery, SelectStatement};
use sea_orm::*;

use crate::entity::{post, post_tag, tag};
use crate::models::shared::escape_like;

/// Column backing a queryable post field.
pub fn post_column(field: PostField) -> post::Column {
    match field {
        PostField::Id => post::Column::Id,
        PostField::Author => post::Column::AuthorId,
        PostField::Caption => post::Column::Caption,
        PostField::Op => post::Column::Op,
        PostField::Src => post::Column::Src,
        PostField::Directory => post::Column::Directory,
        PostField::Hash => post::Column::Hash,
        PostField::Ext => post::Column::Ext,
        PostField::Mime => post::Column::Mime,
        PostField::Size => post::Column::Size,
        PostField::Width => post::Column::Width,
        PostField::Height => post::Column::Height,
        PostField::Score => post::Column::Score,
        PostField::Created => post::Column::CreatedAt,
        PostField::Modified => post::Column::ModifiedAt,
    }
}

/// AND of every clause. An empty predicate yields an empty (always true) condition.
pub fn post_condition(predicate: &Predicate) -> Condition {
    predicate
        .clauses
        .iter()
        .fold(Condition::all(), |cond, clause| cond.add(clause_condition(clause)))
}

fn clause_condition(clause: &Clause) -> Condition {
    match clause {
        Clause::CaptionContains(word) => {
            let term = escape_like(&word.to_lowercase());
            Condition::all().add(
                Expr::expr(Func::lower(Expr::col(post::Column::Caption)))
                    .like(LikeExpr::new(format!("%{term}%")).escape('\\')),
            )
        }
        Clause::Compare { field, op, value } => {
            let col = post_column(*field);
            let value = sql_value(value);
            Condition::all().add(match op {
                AttrOp::Lt => col.lt(value),
                AttrOp::Gt => col.gt(value),
                AttrOp::Eq => col.eq(value),
            })
        }
        Clause::Unset(field) => {
            let col = post_column(*field);
            match field.kind() {
                FieldKind::Text => Condition::any().add(col.is_null()).add(col.eq("")),
                FieldKind::Integer | FieldKind::Timestamp => Condition::all().add(col.is_null()),
            }
        }
        Clause::HasTag(name) => {
            Condition::all().add(post::Column::Id.in_subquery(posts_with_tag(name)))
        }
        Clause::LacksTag(name) => {
            Condition::all().add(post::Column::Id.not_in_subquery(posts_with_tag(name)))
        }
        Clause::Untagged => Condition::all().add(post::Column::Id.not_in_subquery(tagged_posts())),
        Clause::Tagged => Condition::all().add(post::Column::Id.in_subquery(tagged_posts())),
        Clause::Removed(removed) => Condition::all().add(post::Column::Removed.eq(*removed)),
    }
}

fn sql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Integer(n) => Value::from(*n),
        FieldValue::Text(s) => Value::from(s.clone()),
        FieldValue::Timestamp(ts) => Value::from(*ts),
    }
}

/// `SELECT post_id FROM post_tag WHERE tag_id IN (SELECT id FROM tag WHERE name = ?)`
fn posts_with_tag(name: &str) -> SelectStatement {
    SeaQuery::select()
        .column(post_tag::Column::PostId)
        .from(post_tag::Entity)
        .and_where(
            post_tag::Column::TagId.in_subquery(
                SeaQuery::select()
                    .column(tag::Column::Id)
                    .from(tag::Entity)
                    .and_where(tag::Column::Name.eq(name))
                    .to_owned(),
            ),
        )
        .to_owned()
}

fn tagged_posts() -> SelectStatement {
    SeaQuery::select()
        .column(post_tag::Column::PostId)
        .from(post_tag::Entity)
        .to_owned()
}
