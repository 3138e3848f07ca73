//! # Mutation Queue
//!
//! Serializes counter writes into one ordered stream. A single worker task
//! owns the receiving end of an unbounded channel and runs each mutation to
//! completion before taking the next, so writes reach the store strictly in
//! enqueue order across the whole feed.

use super::feed_store::FeedStore;
use super::store::StorePath;
use crate::board::error::{BoardError, BoardResult};
use tokio::sync::{mpsc, oneshot};

/// Computes the absolute value to write once the mutation's turn comes
pub type NextValue = Box<dyn FnOnce() -> u64 + Send>;

/// A counter write waiting for its turn
pub struct PendingMutation {
    pub address: StorePath,
    next_value: NextValue,
}

impl PendingMutation {
    pub fn new(address: StorePath, next_value: impl FnOnce() -> u64 + Send + 'static) -> Self {
        Self {
            address,
            next_value: Box::new(next_value),
        }
    }

    /// Mutation writing a value already computed by the caller
    pub fn absolute(address: StorePath, value: u64) -> Self {
        Self::new(address, move || value)
    }
}

impl std::fmt::Debug for PendingMutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingMutation")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Result of one completed round trip
#[derive(Debug)]
pub struct MutationOutcome {
    pub address: StorePath,
    pub value: u64,
    pub result: BoardResult<()>,
}

/// Completion signal returned by [`MutationQueue::enqueue`]
#[derive(Debug)]
pub struct MutationHandle {
    receiver: oneshot::Receiver<MutationOutcome>,
}

impl MutationHandle {
    /// Wait until this mutation and everything before it has finished
    pub async fn wait(self) -> BoardResult<MutationOutcome> {
        self.receiver.await.map_err(|_| BoardError::QueueClosed)
    }

    /// Check for completion without blocking
    pub fn try_outcome(&mut self) -> Option<BoardResult<MutationOutcome>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(Ok(outcome)),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(BoardError::QueueClosed)),
        }
    }
}

struct Job {
    mutation: PendingMutation,
    reply: oneshot::Sender<MutationOutcome>,
}

/// Serial executor for counter writes.
///
/// Must be created inside a tokio runtime. Dropping the queue does not
/// cancel anything already enqueued; the worker drains the channel first.
pub struct MutationQueue {
    sender: mpsc::UnboundedSender<Job>,
}

impl MutationQueue {
    pub fn new(feed_store: FeedStore) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();

        tokio::spawn(async move {
            tracing::debug!("Mutation worker started");
            while let Some(job) = receiver.recv().await {
                let Job { mutation, reply } = job;
                let value = (mutation.next_value)();
                let result = feed_store.write_counter(&mutation.address, value).await;

                if let Err(e) = &result {
                    tracing::warn!("Counter write {} = {} failed: {}", mutation.address, value, e);
                }

                // Receiver may have been dropped
                let _ = reply.send(MutationOutcome {
                    address: mutation.address,
                    value,
                    result,
                });
            }
            tracing::debug!("Mutation worker stopped");
        });

        Self { sender }
    }

    /// Append a mutation to the feed-wide sequence
    pub fn enqueue(&self, mutation: PendingMutation) -> BoardResult<MutationHandle> {
        tracing::debug!("Enqueuing mutation for {}", mutation.address);
        let (reply, receiver) = oneshot::channel();
        self.sender
            .send(Job { mutation, reply })
            .map_err(|_| BoardError::QueueClosed)?;
        Ok(MutationHandle { receiver })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::models::PostId;
    use crate::board::services::memory_store::MemoryStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn queue() -> (Arc<MemoryStore>, MutationQueue) {
        let store = Arc::new(MemoryStore::new());
        let queue = MutationQueue::new(FeedStore::new(store.clone()));
        (store, queue)
    }

    #[tokio::test]
    async fn queue_should_write_in_enqueue_order() {
        let (store, queue) = queue();
        store.set_latency(Some(Duration::from_millis(20)));
        let a = StorePath::post_likes(&PostId::new("a"));
        let b = StorePath::post_likes(&PostId::new("b"));

        let first = queue.enqueue(PendingMutation::absolute(a.clone(), 1)).unwrap();
        let second = queue.enqueue(PendingMutation::absolute(b.clone(), 4)).unwrap();

        second.wait().await.unwrap().result.unwrap();
        first.wait().await.unwrap().result.unwrap();

        let calls = store.overwrites();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].path, a);
        assert_eq!(calls[0].value, json!(1));
        assert_eq!(calls[1].path, b);
        assert_eq!(calls[1].value, json!(4));
    }

    #[tokio::test]
    async fn next_value_should_run_after_predecessor_completes() {
        let (store, queue) = queue();
        store.set_latency(Some(Duration::from_millis(10)));
        let path = StorePath::post_likes(&PostId::new("a"));
        let counter = Arc::new(AtomicU64::new(0));

        let mut handles = Vec::new();
        for _ in 0..3 {
            let counter = counter.clone();
            handles.push(
                queue
                    .enqueue(PendingMutation::new(path.clone(), move || {
                        counter.fetch_add(1, Ordering::SeqCst) + 1
                    }))
                    .unwrap(),
            );
        }
        for handle in handles {
            handle.wait().await.unwrap();
        }

        let values: Vec<_> = store.overwrites().into_iter().map(|c| c.value).collect();
        assert_eq!(values, vec![json!(1), json!(2), json!(3)]);
    }

    #[tokio::test]
    async fn failed_write_should_be_reported_in_outcome() {
        let (store, queue) = queue();
        store.set_offline(true);
        let outcome = queue
            .enqueue(PendingMutation::absolute(
                StorePath::post_likes(&PostId::new("a")),
                1,
            ))
            .unwrap()
            .wait()
            .await
            .unwrap();
        assert!(matches!(outcome.result, Err(BoardError::Network(_))));
        assert_eq!(outcome.value, 1);
    }

    #[tokio::test]
    async fn enqueued_work_should_run_after_queue_is_dropped() {
        let (store, queue) = queue();
        let handle = queue
            .enqueue(PendingMutation::absolute(
                StorePath::post_likes(&PostId::new("a")),
                7,
            ))
            .unwrap();
        drop(queue);

        handle.wait().await.unwrap().result.unwrap();
        assert_eq!(store.overwrites().len(), 1);
    }
}
