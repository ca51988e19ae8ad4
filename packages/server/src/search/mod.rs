pub mod condition;

pub use condition::{post_column, post_condition};
