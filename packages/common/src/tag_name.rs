use thiserror::Error;

/// Longest tag name accepted after normalization.
pub const MAX_TAG_NAME_LEN: usize = 30;

/// Search keyword that restricts results to removed posts.
pub const REMOVED_KEYWORD: &str = "removed";

/// Search keyword that restricts results to posts without tags.
pub const NO_TAGS_KEYWORD: &str = "no_tags";

/// Names that carry meaning in the search grammar and can never be tags.
pub const RESERVED_KEYWORDS: &[&str] = &[REMOVED_KEYWORD, NO_TAGS_KEYWORD];

/// Why a tag name was rejected on the create path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagNameError {
    #[error("tag name contains no valid characters")]
    Empty,
    #[error("tag name must be at most {MAX_TAG_NAME_LEN} characters")]
    TooLong,
    #[error("`{0}` is a reserved search keyword")]
    Reserved(String),
}

/// Characters allowed in a tag name (ASCII alphanumerics plus `-_()`).
pub fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '(' | ')')
}

/// Lossy normalization used on the read path.
///
/// Drops every character outside the tag charset, lowercases the rest and
/// strips leading `-` (the negation marker). The result may be empty.
pub fn normalize_tag_name(raw: &str) -> String {
    let name: String = raw
        .trim()
        .chars()
        .filter(|c| is_tag_char(*c))
        .map(|c| c.to_ascii_lowercase())
        .collect();
    name.trim_start_matches('-').to_string()
}

/// Strict normalization used when a tag may be created.
pub fn validate_tag_name(raw: &str) -> Result<String, TagNameError> {
    let name = normalize_tag_name(raw);
    if name.is_empty() {
        return Err(TagNameError::Empty);
    }
    if name.len() > MAX_TAG_NAME_LEN {
        return Err(TagNameError::TooLong);
    }
    if RESERVED_KEYWORDS.contains(&name.as_str()) {
        return Err(TagNameError::Reserved(name));
    }
    Ok(name)
}
