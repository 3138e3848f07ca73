//! # Counter Mutations
//!
//! Optimistic like and comment-count updates, and the rollback applied when
//! the queued write behind one of them fails.

use super::core::{CounterChange, CounterUndo, FeedRenderer, TrackedMutation};
use crate::board::error::BoardResult;
use crate::board::events::{Notice, ViewEvent};
use crate::board::models::PostId;
use crate::board::services::{MutationOutcome, PendingMutation, StorePath};

impl FeedRenderer {
    /// Like a post once from this device.
    ///
    /// The cached count and the local flag change immediately; the absolute
    /// new count is queued behind every earlier write. Returns `false` when
    /// the post is unknown or already liked.
    pub fn like(&mut self, post_id: &PostId) -> BoardResult<bool> {
        if self.like_ledger.is_liked(post_id) {
            tracing::debug!("Post {} already liked from this device", post_id);
            return Ok(false);
        }
        let Some(entry) = self.entry_mut(post_id) else {
            tracing::debug!("Like ignored for unknown post {}", post_id);
            return Ok(false);
        };

        let previous = entry.post.like_count;
        let next = previous + 1;
        entry.post.like_count = next;
        entry.liked = true;

        if let Err(e) = self.like_ledger.mark_liked(post_id) {
            self.restore_like(post_id, previous, next);
            return Err(e);
        }

        let undo = CounterUndo {
            change: CounterChange::Like,
            post_id: post_id.clone(),
            previous,
            written: next,
        };
        let mutation = PendingMutation::absolute(StorePath::post_likes(post_id), next);
        match self.mutation_queue.enqueue(mutation) {
            Ok(handle) => {
                self.pending_mutations.push(TrackedMutation { undo, handle });
                self.emit_view_event(ViewEvent::PostRedrawRequired {
                    post_id: post_id.clone(),
                });
                Ok(true)
            }
            Err(e) => {
                self.restore_like(post_id, previous, next);
                if let Err(ledger_err) = self.like_ledger.unmark_liked(post_id) {
                    tracing::warn!("Could not clear like flag for {}: {}", post_id, ledger_err);
                }
                Err(e)
            }
        }
    }

    /// Queue the comment count of `post_id` as an absolute value
    pub(super) fn enqueue_comment_count(
        &mut self,
        post_id: &PostId,
        previous: u64,
        next: u64,
    ) -> BoardResult<()> {
        let mutation = PendingMutation::absolute(StorePath::post_comments_count(post_id), next);
        let handle = self.mutation_queue.enqueue(mutation)?;
        self.pending_mutations.push(TrackedMutation {
            undo: CounterUndo {
                change: CounterChange::CommentCount,
                post_id: post_id.clone(),
                previous,
                written: next,
            },
            handle,
        });
        Ok(())
    }

    /// Apply outcomes of writes that already finished, without waiting
    pub fn poll_mutations(&mut self) -> usize {
        let mut finished = Vec::new();
        let mut index = 0;
        while index < self.pending_mutations.len() {
            match self.pending_mutations[index].handle.try_outcome() {
                Some(outcome) => {
                    let tracked = self.pending_mutations.remove(index);
                    finished.push((tracked.undo, outcome));
                }
                None => index += 1,
            }
        }

        let count = finished.len();
        for (undo, outcome) in finished {
            self.apply_outcome(undo, outcome);
        }
        count
    }

    /// Wait for every queued write and apply the outcomes in queue order
    pub async fn settle_mutations(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending_mutations);
        let count = pending.len();
        for TrackedMutation { undo, handle } in pending {
            let outcome = handle.wait().await;
            self.apply_outcome(undo, outcome);
        }
        count
    }

    fn apply_outcome(&mut self, undo: CounterUndo, outcome: BoardResult<MutationOutcome>) {
        let failure = match outcome {
            Ok(MutationOutcome { result: Ok(()), .. }) => {
                tracing::debug!(
                    "Counter write for {} confirmed at {}",
                    undo.post_id,
                    undo.written
                );
                return;
            }
            Ok(MutationOutcome { result: Err(e), .. }) => e,
            Err(e) => e,
        };

        tracing::warn!(
            "Rolling back {:?} on {}: {}",
            undo.change,
            undo.post_id,
            failure
        );
        let message = match undo.change {
            CounterChange::Like => {
                self.restore_like(&undo.post_id, undo.previous, undo.written);
                if let Err(e) = self.like_ledger.unmark_liked(&undo.post_id) {
                    tracing::warn!("Could not clear like flag for {}: {}", undo.post_id, e);
                }
                "Could not save your like."
            }
            CounterChange::CommentCount => {
                if let Some(entry) = self.entry_mut(&undo.post_id) {
                    if entry.post.comment_count == undo.written {
                        entry.post.comment_count = undo.previous;
                    }
                }
                "Could not update the comment count."
            }
        };

        self.emit_view_event(ViewEvent::PostRedrawRequired {
            post_id: undo.post_id,
        });
        self.raise_notice(Notice::transient(message));
    }

    /// Undo an optimistic like unless a reload already replaced the count
    fn restore_like(&mut self, post_id: &PostId, previous: u64, written: u64) {
        if let Some(entry) = self.entry_mut(post_id) {
            if entry.post.like_count == written {
                entry.post.like_count = previous;
            }
            entry.liked = false;
        }
    }

    pub(super) fn raise_notice(&mut self, notice: Notice) {
        self.emit_view_event(ViewEvent::NoticeRaised(notice));
    }
}
