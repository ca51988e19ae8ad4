use chrono::{DateTime, NaiveDate, Utc};

use crate::query::AttrValue;

/// Storage kind of a queryable post field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
    Timestamp,
}

/// Post fields reachable from `name:value` search clauses and `sort`.
///
/// Names outside this set are ignored by the filter compiler and fall back to
/// the default sort key in pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostField {
    Id,
    Author,
    Caption,
    Op,
    Src,
    Directory,
    Hash,
    Ext,
    Mime,
    Size,
    Width,
    Height,
    Score,
    Created,
    Modified,
}

impl PostField {
    pub const ALL: &'static [PostField] = &[
        Self::Id,
        Self::Author,
        Self::Caption,
        Self::Op,
        Self::Src,
        Self::Directory,
        Self::Hash,
        Self::Ext,
        Self::Mime,
        Self::Size,
        Self::Width,
        Self::Height,
        Self::Score,
        Self::Created,
        Self::Modified,
    ];

    /// Resolve a clause or sort name. Matching is case-insensitive and `md5`
    /// is accepted as an alias of `hash`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        if name == "md5" {
            return Some(Self::Hash);
        }
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Author => "author",
            Self::Caption => "caption",
            Self::Op => "op",
            Self::Src => "src",
            Self::Directory => "directory",
            Self::Hash => "hash",
            Self::Ext => "ext",
            Self::Mime => "mime",
            Self::Size => "size",
            Self::Width => "width",
            Self::Height => "height",
            Self::Score => "score",
            Self::Created => "created",
            Self::Modified => "modified",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Id | Self::Author | Self::Size | Self::Width | Self::Height | Self::Score => {
                FieldKind::Integer
            }
            Self::Caption
            | Self::Op
            | Self::Src
            | Self::Directory
            | Self::Hash
            | Self::Ext
            | Self::Mime => FieldKind::Text,
            Self::Created | Self::Modified => FieldKind::Timestamp,
        }
    }

    /// Whether an "unset" clause on this field can ever match.
    ///
    /// `score` is materialized and never null, so `score:` is dropped rather
    /// than compiled to a clause that matches nothing.
    pub fn can_be_unset(&self) -> bool {
        !matches!(self, Self::Score)
    }
}

/// A clause value coerced to the kind of its field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// Coerce a parsed value to `kind`. Returns `None` when the value does not
    /// fit (e.g. `width:abc`) or is the empty sentinel.
    ///
    /// Timestamps accept RFC 3339, a bare `YYYY-MM-DD` date (midnight UTC) or
    /// an integer number of Unix seconds.
    pub fn coerce(value: &AttrValue, kind: FieldKind) -> Option<Self> {
        match (value, kind) {
            (AttrValue::Empty, _) => None,
            (AttrValue::Int(n), FieldKind::Integer) => Some(Self::Integer(*n)),
            (AttrValue::Text(_), FieldKind::Integer) => None,
            (AttrValue::Int(n), FieldKind::Text) => Some(Self::Text(n.to_string())),
            (AttrValue::Text(s), FieldKind::Text) => Some(Self::Text(s.clone())),
            (AttrValue::Int(n), FieldKind::Timestamp) => {
                DateTime::from_timestamp(*n, 0).map(Self::Timestamp)
            }
            (AttrValue::Text(s), FieldKind::Timestamp) => parse_timestamp(s).map(Self::Timestamp),
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
