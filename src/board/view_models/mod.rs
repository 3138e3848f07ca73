//! # Feed View Model
//!
//! The FeedRenderer split into focused responsibilities: feed state and
//! loading, counter mutations, threads and submits, and rendering.

mod core;
mod mutation_manager;
mod rendering_coordinator;
mod thread_manager;
pub mod time_ago;


pub use self::core::{CommentThread, FeedRenderer, FeedState, PostEntry, DEFAULT_POSTS_LIMIT};
pub use time_ago::{now_seconds, time_ago};
