pub mod field;
pub mod filter;
pub mod page;
pub mod query;
pub mod removable;
pub mod tag_name;
pub mod tag_type;

pub use field::{FieldKind, FieldValue, PostField};
pub use filter::{Clause, FilterDefaults, Predicate};
pub use page::{PageError, PageRequest, PaginationConfig, SortDirection};
pub use query::{AttrOp, AttrValue, ParsedQuery};
pub use removable::{RemovableKind, RemovalTarget};
pub use tag_name::TagNameError;
pub use tag_type::TagType;
