use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Accepts exactly `asc` or `desc`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Server-wide pagination limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_limit: u64,
    pub max_limit: u64,
    pub default_direction: SortDirection,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
            default_direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page is required")]
    MissingPage,
    #[error("page must be at least 1")]
    PageOutOfRange,
}

/// Validated browse parameters.
///
/// `sort` is kept as given: only the entity being paged knows which names are
/// sortable, and falls back to its default key for anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
    pub sort: Option<String>,
    pub direction: SortDirection,
}

impl PageRequest {
    pub fn resolve(
        page: Option<i64>,
        limit: Option<u64>,
        sort: Option<&str>,
        direction: Option<&str>,
        config: &PaginationConfig,
    ) -> Result<Self, PageError> {
        let page = page.ok_or(PageError::MissingPage)?;
        let page = u64::try_from(page)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or(PageError::PageOutOfRange)?;

        let max = config.max_limit.max(1);
        let limit = limit.unwrap_or(config.default_limit).clamp(1, max);

        let sort = sort
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let direction = direction
            .and_then(SortDirection::parse)
            .unwrap_or(config.default_direction);

        Ok(Self {
            page,
            limit,
            sort,
            direction,
        })
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}
