#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of a tag.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
#[serde(rename_all = "lowercase")]
pub enum TagType {
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "general"))]
    General,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "artist"))]
    Artist,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "character"))]
    Character,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "copyright"))]
    Copyright,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "meta"))]
    Meta,
}

impl TagType {
    pub const ALL: &'static [TagType] = &[
        Self::General,
        Self::Artist,
        Self::Character,
        Self::Copyright,
        Self::Meta,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Artist => "artist",
            Self::Character => "character",
            Self::Copyright => "copyright",
            Self::Meta => "meta",
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an unknown tag type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTagTypeError {
    invalid: String,
}

impl fmt::Display for ParseTagTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tag type: {}", self.invalid)
    }
}

impl std::error::Error for ParseTagTypeError {}

impl FromStr for TagType {
    type Err = ParseTagTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseTagTypeError {
                invalid: s.to_string(),
            })
    }
}
