//! Search query parser.
//!
//! A raw query is split into three disjoint clause kinds, in this order:
//!
//! 1. quoted caption text (`"blue sky"`),
//! 2. attribute clauses (`width:>1000`, `src:`, `ext:png`),
//! 3. bare tag tokens (`landscape -portrait`).
//!
//! Quoted spans are cut out before attributes are matched, and attribute
//! text (from a word boundary to the end of its token) is cut out before the
//! remainder is read as tags, so a clause is never claimed twice. Parsing never fails; anything unusable is dropped.

use std::fmt;

use crate::tag_name::normalize_tag_name;

/// Comparison sign of an attribute clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrOp {
    Lt,
    Gt,
    Eq,
}

impl AttrOp {
    fn sign(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Eq => "",
        }
    }
}

/// Value of an attribute clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrValue {
    Int(i64),
    Text(String),
    /// Nothing followed the colon (`src:`): the field is unset.
    Empty,
}

impl AttrValue {
    fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Empty;
        }
        match raw.parse::<i64>() {
            Ok(n) => Self::Int(n),
            Err(_) => Self::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Empty => Ok(()),
        }
    }
}

/// `name:[<>]value`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttrClause {
    pub name: String,
    pub op: AttrOp,
    pub value: AttrValue,
}

/// A bare tag token, `-name` when negated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagToken {
    pub negated: bool,
    pub name: String,
}

impl TagToken {
    pub fn positive(name: impl Into<String>) -> Self {
        Self {
            negated: false,
            name: name.into(),
        }
    }

    pub fn negative(name: impl Into<String>) -> Self {
        Self {
            negated: true,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub caption: Option<String>,
    pub attrs: Vec<AttrClause>,
    pub tags: Vec<TagToken>,
}

/// Canonical form; parsing it yields an equal `ParsedQuery`.
impl fmt::Display for ParsedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(caption) = &self.caption {
            parts.push(format!("\"{caption}\""));
        }
        for attr in &self.attrs {
            parts.push(format!("{}:{}{}", attr.name, attr.op.sign(), attr.value));
        }
        for tag in &self.tags {
            let sign = if tag.negated { "-" } else { "" };
            parts.push(format!("{sign}{}", tag.name));
        }
        f.write_str(&parts.join(" "))
    }
}

/// Parse a raw search string.
pub fn parse(raw: &str) -> ParsedQuery {
    let (caption, rest) = take_quoted(raw);

    let mut attrs = Vec::new();
    let mut tags = Vec::new();

    for token in rest.split_ascii_whitespace() {
        let (token, attr) = split_attr(token);
        if let Some(attr) = attr {
            attrs.push(attr);
        }

        let (negated, body) = match token.strip_prefix('-') {
            Some(body) => (true, body),
            None => (false, token),
        };
        let name = normalize_tag_name(body);
        if !name.is_empty() {
            tags.push(TagToken { negated, name });
        }
    }

    ParsedQuery {
        caption,
        attrs,
        tags,
    }
}

/// Cut every complete `"..."` span out of `raw`, keeping the first as caption.
fn take_quoted(raw: &str) -> (Option<String>, String) {
    let mut caption = None;
    let mut rest = String::with_capacity(raw.len());
    let mut remaining = raw;

    while let Some(open) = remaining.find('"') {
        let after = &remaining[open + 1..];
        let Some(close) = after.find('"') else {
            break;
        };
        rest.push_str(&remaining[..open]);
        rest.push(' ');
        if caption.is_none() {
            caption = Some(after[..close].to_string());
        }
        remaining = &after[close + 1..];
    }
    rest.push_str(remaining);

    (caption, rest)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split `token` at the first `word:` that starts on a word boundary.
///
/// The attribute runs to the end of the token; whatever precedes it is
/// returned so it can still be read as a tag (`(x)width:3` keeps `(x)`).
fn split_attr(token: &str) -> (&str, Option<AttrClause>) {
    let mut prev_is_word = false;
    for (start, c) in token.char_indices() {
        let starts_word = is_word_char(c) && !prev_is_word;
        prev_is_word = is_word_char(c);
        if !starts_word {
            continue;
        }

        let end = token[start..]
            .find(|c: char| !is_word_char(c))
            .map_or(token.len(), |len| start + len);
        if let Some(raw_value) = token[end..].strip_prefix(':') {
            let attr = attr_clause(&token[start..end], raw_value);
            return (&token[..start], Some(attr));
        }
    }
    (token, None)
}

fn attr_clause(name: &str, raw_value: &str) -> AttrClause {
    let (op, value) = if let Some(v) = raw_value.strip_prefix('<') {
        (AttrOp::Lt, v)
    } else if let Some(v) = raw_value.strip_prefix('>') {
        (AttrOp::Gt, v)
    } else {
        (AttrOp::Eq, raw_value)
    };

    AttrClause {
        name: name.to_string(),
        op,
        value: AttrValue::parse(value),
    }
}
