//! # Models Module
//!
//! Re-exports all model implementations organized by category.

pub mod buffer_model;
pub mod catalog;
pub mod like_ledger;
pub mod media;
pub mod post;

pub use buffer_model::{BufferContent, BufferModel};
pub use catalog::{Catalog, SEARCH_RESULT_LIMIT};
pub use like_ledger::{FileLikeLedger, LikeLedger, MemoryLikeLedger};
pub use media::{activity_phrase, MediaItem, MediaReference, MediaType, SourceId};
pub use post::{
    display_name, Comment, CommentId, CommentRecord, NewComment, NewPost, Post, PostId,
    PostRecord, ANONYMOUS,
};
