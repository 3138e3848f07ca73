//! # Feed Store
//!
//! Read/write adapter between the board's models and the document store.
//! Knows the collection layout, decodes stored documents and keeps the
//! client-side ordering rules for posts and comments.

use super::store::{ChildQuery, DocumentStore, StorePath, TIMESTAMP_FIELD};
use crate::board::error::{BoardError, BoardResult};
use crate::board::markup::encode;
use crate::board::models::{
    activity_phrase, display_name, Comment, CommentId, CommentRecord, MediaReference, NewComment,
    NewPost, Post, PostId, PostRecord,
};
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Clone)]
pub struct FeedStore {
    store: Arc<dyn DocumentStore>,
}

impl FeedStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Most recent `limit` posts, newest first.
    ///
    /// The store returns children in key order, so the result is always
    /// re-sorted by creation time here.
    pub async fn load_posts(&self, limit: usize) -> BoardResult<Vec<Post>> {
        tracing::debug!("Loading up to {} posts", limit);
        let query = ChildQuery::last_by(TIMESTAMP_FIELD, limit);
        let value = self.store.read(&StorePath::posts(), Some(&query)).await?;

        let mut posts: Vec<Post> = children(value, "posts")?
            .into_iter()
            .filter_map(|(key, child)| decode_post(key, child))
            .collect();

        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        tracing::info!("Loaded {} posts", posts.len());
        Ok(posts)
    }

    /// Comments of one post in the order the store returns them
    pub async fn load_comments(&self, post_id: &PostId) -> BoardResult<Vec<Comment>> {
        tracing::debug!("Loading comments for {}", post_id);
        let value = self.store.read(&StorePath::comments(post_id), None).await?;

        let comments = children(value, "comments")?
            .into_iter()
            .filter_map(|(key, child)| {
                match serde_json::from_value::<CommentRecord>(child) {
                    Ok(record) => Some(record.into_comment(CommentId::new(key), post_id.clone())),
                    Err(e) => {
                        tracing::warn!("Skipping malformed comment {}/{}: {}", post_id, key, e);
                        None
                    }
                }
            })
            .collect();
        Ok(comments)
    }

    /// Store a new post and return its key. Nothing is cached here, so
    /// callers reload the feed to see it.
    pub async fn create_post(&self, post: &NewPost) -> BoardResult<PostId> {
        let document = serde_json::to_value(PostRecord::from(post))?;
        let key = self.store.create(&StorePath::posts(), document).await?;
        Ok(PostId::new(key))
    }

    /// Store a new comment under `post_id` and return its key
    pub async fn create_comment(
        &self,
        post_id: &PostId,
        comment: &NewComment,
    ) -> BoardResult<CommentId> {
        let document = serde_json::to_value(CommentRecord::from(comment))?;
        let key = self
            .store
            .create(&StorePath::comments(post_id), document)
            .await?;
        Ok(CommentId::new(key))
    }

    /// Overwrite a counter with an absolute value
    pub async fn write_counter(&self, address: &StorePath, value: u64) -> BoardResult<()> {
        tracing::debug!("Writing counter {} = {}", address, value);
        self.store.overwrite(address, Value::from(value)).await
    }
}

/// Children of a collection read; `null` is an empty collection
fn children(value: Value, what: &str) -> BoardResult<Map<String, Value>> {
    match value {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map),
        other => Err(BoardError::MalformedResponse(format!(
            "expected an object of {what}, got {other}"
        ))),
    }
}

fn decode_post(key: String, child: Value) -> Option<Post> {
    let record = match serde_json::from_value::<PostRecord>(child) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!("Skipping malformed post {}: {}", key, e);
            return None;
        }
    };

    let body = match (record.text, record.item) {
        (Some(text), _) => text,
        (None, Some(item)) => {
            let reference = MediaReference::from(&item);
            format!(
                "{} {}",
                activity_phrase(&item.status, item.media_type),
                encode(&reference)
            )
        }
        (None, None) => {
            tracing::warn!("Skipping post {} without text or item", key);
            return None;
        }
    };

    Some(Post {
        id: PostId::new(key),
        author: display_name(&record.username),
        body,
        created_at: record.timestamp,
        like_count: record.likes,
        comment_count: record.comments_count,
    })
}
