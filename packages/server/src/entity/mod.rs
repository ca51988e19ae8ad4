pub mod comment;
pub mod post;
pub mod post_tag;
pub mod removed_log;
pub mod snapshot;
pub mod tag;
pub mod user;
pub mod vote;
