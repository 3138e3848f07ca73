//! # Board Module
//!
//! Discussion board core organized the same way as the rest of the crate:
//! models and events at the bottom, services for store access, the feed
//! view model on top and a controller that drives it.

pub mod composer;
pub mod controllers;
pub mod error;
pub mod events;
pub mod markup;
pub mod models;
pub mod services;
pub mod view_models;

// Re-export main types for convenience
pub use composer::Composer;
pub use controllers::AppController;
pub use error::{BoardError, BoardResult};
pub use events::{BoardEvent, EventBus, Notice, NoticeKind, SimpleEventBus, ViewEvent};
pub use markup::{DisplayFragment, MarkupEngine};
pub use models::{Catalog, Comment, MediaItem, MediaReference, MediaType, Post, PostId};
pub use services::{
    DocumentStore, FeedStore, HttpDocumentStore, MemoryStore, MutationQueue, PendingMutation,
    StorePath,
};
pub use view_models::{FeedRenderer, FeedState, PostEntry};
