pub mod comment;
pub mod post;
pub mod removed;
pub mod snapshot;
pub mod tag;
