//! # Services Module
//!
//! Document store access and the serialized write path.

pub mod feed_store;
pub mod http_store;
pub mod memory_store;
pub mod mutation_queue;
pub mod store;

pub use feed_store::FeedStore;
pub use http_store::HttpDocumentStore;
pub use memory_store::{MemoryStore, OverwriteCall};
pub use mutation_queue::{MutationHandle, MutationOutcome, MutationQueue, PendingMutation};
pub use store::{ChildQuery, DocumentStore, StorePath};
