//! Filter compiler: turns a [`ParsedQuery`] into a store-independent
//! [`Predicate`].
//!
//! Compilation is a pure function of the parsed query and [`FilterDefaults`].
//! The resulting clauses are always emitted in the same order: caption words,
//! attribute clauses, the removed-state clause, then tag clauses.

use crate::field::{FieldValue, PostField};
use crate::query::{AttrOp, AttrValue, ParsedQuery, TagToken};
use crate::tag_name::{NO_TAGS_KEYWORD, REMOVED_KEYWORD};

/// Policies applied when the query does not override them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDefaults {
    /// Tag hidden unless the query mentions it.
    pub sensitive_tag: String,
    /// Exclude removed posts unless the query asks for them.
    pub hide_removed: bool,
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            sensitive_tag: "nsfw".to_string(),
            hide_removed: true,
        }
    }
}

/// One conjunct of a [`Predicate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// Case-insensitive substring match of one caption word.
    CaptionContains(String),
    Compare {
        field: PostField,
        op: AttrOp,
        value: FieldValue,
    },
    /// Field is null, or empty for text fields.
    Unset(PostField),
    HasTag(String),
    LacksTag(String),
    /// Post has no tag memberships.
    Untagged,
    /// Post has at least one tag membership.
    Tagged,
    /// Post `removed` flag equals the value.
    Removed(bool),
}

/// Conjunction of clauses. An empty predicate matches every post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    pub clauses: Vec<Clause>,
}

pub fn compile(parsed: &ParsedQuery, defaults: &FilterDefaults) -> Predicate {
    let mut clauses = Vec::new();

    if let Some(caption) = &parsed.caption {
        clauses.extend(
            caption
                .split_whitespace()
                .map(|word| Clause::CaptionContains(word.to_string())),
        );
    }

    clauses.extend(parsed.attrs.iter().filter_map(|attr| {
        let field = PostField::from_name(&attr.name)?;
        compile_attr(field, attr.op, &attr.value)
    }));

    let mut tags: Vec<&TagToken> = Vec::with_capacity(parsed.tags.len());
    for token in &parsed.tags {
        if !tags.contains(&token) {
            tags.push(token);
        }
    }

    let wants_removed = take_keyword(&mut tags, REMOVED_KEYWORD, false);
    let rejects_removed = take_keyword(&mut tags, REMOVED_KEYWORD, true);
    if wants_removed {
        clauses.push(Clause::Removed(true));
    } else if defaults.hide_removed || rejects_removed {
        clauses.push(Clause::Removed(false));
    }

    let wants_untagged = take_keyword(&mut tags, NO_TAGS_KEYWORD, false);
    let wants_tagged = take_keyword(&mut tags, NO_TAGS_KEYWORD, true);
    if wants_untagged {
        // Ordinary tag tokens cannot hold on an untagged post; they are ignored.
        clauses.push(Clause::Untagged);
        return Predicate { clauses };
    }
    if wants_tagged {
        clauses.push(Clause::Tagged);
    }

    let mentions_sensitive = tags.iter().any(|t| t.name == defaults.sensitive_tag);
    clauses.extend(tags.iter().map(|t| {
        if t.negated {
            Clause::LacksTag(t.name.clone())
        } else {
            Clause::HasTag(t.name.clone())
        }
    }));
    if !mentions_sensitive && !defaults.sensitive_tag.is_empty() {
        clauses.push(Clause::LacksTag(defaults.sensitive_tag.clone()));
    }

    Predicate { clauses }
}

fn compile_attr(field: PostField, op: AttrOp, value: &AttrValue) -> Option<Clause> {
    let unset = match value {
        AttrValue::Empty => true,
        AttrValue::Int(0) => op == AttrOp::Eq,
        _ => false,
    };
    if unset {
        return field.can_be_unset().then_some(Clause::Unset(field));
    }

    let value = FieldValue::coerce(value, field.kind())?;
    Some(Clause::Compare { field, op, value })
}

/// Remove every `keyword` token of the given polarity, reporting whether one
/// was present.
fn take_keyword(tags: &mut Vec<&TagToken>, keyword: &str, negated: bool) -> bool {
    let before = tags.len();
    tags.retain(|t| !(t.negated == negated && t.name == keyword));
    tags.len() != before
}
