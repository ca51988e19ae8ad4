use common::{PageRequest, PaginationConfig};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;
use crate::pagination::Page;

/// Pagination metadata included in list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page after clamping.
    #[schema(example = 20)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub total_pages: u64,
}

impl<M> From<&Page<M>> for Pagination {
    fn from(page: &Page<M>) -> Self {
        Self {
            page: page.page,
            per_page: page.per_page,
            total: page.total,
            total_pages: page.total_pages,
        }
    }
}

/// Paging parameters shared by every list endpoint.
#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number, starting at 1. Required.
    pub page: Option<i64>,
    /// Items per page; clamped to the server maximum.
    pub limit: Option<u64>,
    /// Sort field. Unknown names fall back to `id`.
    pub sort: Option<String>,
    /// `asc` or `desc`.
    pub direction: Option<String>,
    /// Alias of `direction`.
    pub sort_by: Option<String>,
}

impl PageQuery {
    pub fn resolve(&self, config: &PaginationConfig) -> Result<PageRequest, AppError> {
        Ok(PageRequest::resolve(
            self.page,
            self.limit,
            self.sort.as_deref(),
            self.direction.as_deref().or(self.sort_by.as_deref()),
            config,
        )?)
    }
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Trim a free-text field; blank input clears it.
pub fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
