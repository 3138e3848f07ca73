//! # Core Feed Structure
//!
//! Contains the FeedRenderer struct, its per-post state and feed loading.
//! Likes, threads, submits and HTML output live in the sibling managers.

use crate::board::composer::Composer;
use crate::board::error::BoardResult;
use crate::board::events::ViewEvent;
use crate::board::markup::MarkupEngine;
use crate::board::models::{Catalog, Comment, LikeLedger, Post, PostId};
use crate::board::services::{FeedStore, MutationHandle, MutationQueue};
use std::sync::Arc;

/// Default number of posts requested per load
pub const DEFAULT_POSTS_LIMIT: usize = 25;

/// What the feed area currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    Loading,
    Loaded,
    Empty,
    /// Load failed; the feed is replaced by an error panel
    Failed(String),
}

/// An expanded comment thread with its own composer
#[derive(Debug, Clone)]
pub struct CommentThread {
    pub comments: Vec<Comment>,
    pub composer: Composer,
}

/// One post in the feed plus its client-side state
#[derive(Debug, Clone)]
pub struct PostEntry {
    pub post: Post,
    pub liked: bool,
    /// `Some` while the thread is expanded
    pub thread: Option<CommentThread>,
}

impl PostEntry {
    pub fn is_expanded(&self) -> bool {
        self.thread.is_some()
    }
}

/// Which optimistic change a queued write belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum CounterChange {
    Like,
    CommentCount,
}

/// What to restore if a queued counter write fails
#[derive(Debug, Clone)]
pub(super) struct CounterUndo {
    pub change: CounterChange,
    pub post_id: PostId,
    pub previous: u64,
    pub written: u64,
}

/// A queued write awaiting its outcome
#[derive(Debug)]
pub(super) struct TrackedMutation {
    pub undo: CounterUndo,
    pub handle: MutationHandle,
}

/// The feed: cached posts, their threads and the write path behind them.
///
/// FeedRenderer is the only writer of the cached feed. All counter writes
/// go through its own MutationQueue.
pub struct FeedRenderer {
    pub(super) feed_store: FeedStore,
    pub(super) mutation_queue: MutationQueue,
    pub(super) like_ledger: Box<dyn LikeLedger>,
    pub(super) catalog: Arc<Catalog>,
    pub(super) engine: MarkupEngine,
    pub(super) composer: Composer,
    pub(super) state: FeedState,
    pub(super) entries: Vec<PostEntry>,
    pub(super) posts_limit: usize,
    pub(super) pending_mutations: Vec<TrackedMutation>,
    pub(super) pending_view_events: Vec<ViewEvent>,
}

impl FeedRenderer {
    /// Create a feed over `feed_store`. Spawns the mutation worker, so this
    /// must run inside a tokio runtime.
    pub fn new(
        feed_store: FeedStore,
        like_ledger: Box<dyn LikeLedger>,
        catalog: Arc<Catalog>,
    ) -> Self {
        let mutation_queue = MutationQueue::new(feed_store.clone());
        Self {
            feed_store,
            mutation_queue,
            like_ledger,
            composer: Composer::new(catalog.clone()),
            catalog,
            engine: MarkupEngine::new(),
            state: FeedState::Loading,
            entries: Vec::new(),
            posts_limit: DEFAULT_POSTS_LIMIT,
            pending_mutations: Vec::new(),
            pending_view_events: Vec::new(),
        }
    }

    pub fn with_posts_limit(mut self, posts_limit: usize) -> Self {
        self.set_posts_limit(posts_limit);
        self
    }

    pub fn set_posts_limit(&mut self, posts_limit: usize) {
        self.posts_limit = posts_limit.max(1);
    }

    pub fn posts_limit(&self) -> usize {
        self.posts_limit
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn entries(&self) -> &[PostEntry] {
        &self.entries
    }

    pub fn entry(&self, post_id: &PostId) -> Option<&PostEntry> {
        self.entries.iter().find(|entry| &entry.post.id == post_id)
    }

    pub(super) fn entry_mut(&mut self, post_id: &PostId) -> Option<&mut PostEntry> {
        self.entries
            .iter_mut()
            .find(|entry| &entry.post.id == post_id)
    }

    /// Composer for new posts
    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }

    /// Composer of an expanded thread
    pub fn thread_composer_mut(&mut self, post_id: &PostId) -> Option<&mut Composer> {
        self.entry_mut(post_id)
            .and_then(|entry| entry.thread.as_mut())
            .map(|thread| &mut thread.composer)
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Number of counter writes not yet observed as finished
    pub fn pending_mutation_count(&self) -> usize {
        self.pending_mutations.len()
    }

    /// Replace the feed with the most recent posts.
    ///
    /// On failure the feed shows the error panel and the error is returned.
    /// Expanded threads are closed by a reload.
    pub async fn load_feed(&mut self) -> BoardResult<()> {
        self.state = FeedState::Loading;
        self.emit_view_event(ViewEvent::FeedRedrawRequired);

        let result = self.feed_store.load_posts(self.posts_limit).await;
        let outcome = match result {
            Ok(posts) => {
                self.entries = posts
                    .into_iter()
                    .map(|post| PostEntry {
                        liked: self.like_ledger.is_liked(&post.id),
                        post,
                        thread: None,
                    })
                    .collect();
                self.state = if self.entries.is_empty() {
                    FeedState::Empty
                } else {
                    FeedState::Loaded
                };
                tracing::info!("Feed loaded with {} posts", self.entries.len());
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to load feed: {}", e);
                self.entries.clear();
                self.state = FeedState::Failed(e.to_string());
                Err(e)
            }
        };

        self.emit_view_event(ViewEvent::FeedRedrawRequired);
        outcome
    }
}
