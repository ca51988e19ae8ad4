#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest removal reason stored; longer input is truncated.
pub const MAX_REASON_LEN: usize = 150;

/// Entity kinds that moderators can remove and restore.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(15))")
)]
#[serde(rename_all = "lowercase")]
pub enum RemovableKind {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "post"))]
    Post,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "comment"))]
    Comment,
}

impl RemovableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for RemovableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RemovableKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "post" => Ok(Self::Post),
            "comment" => Ok(Self::Comment),
            other => Err(format!("unknown removable kind: {other}")),
        }
    }
}

/// A reference to one removable entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RemovalTarget {
    pub kind: RemovableKind,
    pub id: i32,
}

impl RemovalTarget {
    pub fn post(id: i32) -> Self {
        Self {
            kind: RemovableKind::Post,
            id,
        }
    }

    pub fn comment(id: i32) -> Self {
        Self {
            kind: RemovableKind::Comment,
            id,
        }
    }
}

impl fmt::Display for RemovalTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.kind, self.id)
    }
}

/// Trim a removal reason and cut it to [`MAX_REASON_LEN`] characters.
pub fn clamp_reason(reason: &str) -> String {
    reason.trim().chars().take(MAX_REASON_LEN).collect()
}
