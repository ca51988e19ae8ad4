pub mod comments;
pub mod posts;
pub mod removed;
pub mod snapshots;
pub mod tags;
pub mod votes;
