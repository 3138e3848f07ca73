//! # Document Store Abstraction
//!
//! The remote store is a JSON tree addressed as
//! `<base>/<collection>/<key...>.json`. It can read a subtree, append a child
//! under a generated key and overwrite a value at an exact path. There are no
//! transactions and no atomic read-modify-write.

use crate::board::error::BoardResult;
use crate::board::models::PostId;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

pub const POSTS_COLLECTION: &str = "posts";
pub const COMMENTS_COLLECTION: &str = "comments";
pub const LIKES_FIELD: &str = "likes";
pub const COMMENTS_COUNT_FIELD: &str = "comments_count";
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Address of a node in the document tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorePath {
    segments: Vec<String>,
}

impl StorePath {
    pub fn new(collection: &str) -> Self {
        Self {
            segments: vec![collection.to_string()],
        }
    }

    pub fn child(&self, segment: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// REST endpoint for this path under `base`
    pub fn to_url(&self, base: &str) -> String {
        format!("{}/{}.json", base.trim_end_matches('/'), self.segments.join("/"))
    }

    pub fn posts() -> Self {
        Self::new(POSTS_COLLECTION)
    }

    pub fn post_likes(post_id: &PostId) -> Self {
        Self::posts().child(post_id.as_str()).child(LIKES_FIELD)
    }

    pub fn post_comments_count(post_id: &PostId) -> Self {
        Self::posts()
            .child(post_id.as_str())
            .child(COMMENTS_COUNT_FIELD)
    }

    pub fn comments(post_id: &PostId) -> Self {
        Self::new(COMMENTS_COLLECTION).child(post_id.as_str())
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// "Last N children ordered by a field" filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildQuery {
    pub order_by: String,
    pub limit_to_last: usize,
}

impl ChildQuery {
    pub fn last_by(order_by: &str, limit_to_last: usize) -> Self {
        Self {
            order_by: order_by.to_string(),
            limit_to_last,
        }
    }
}

/// Remote document store operations
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a subtree. `Value::Null` means nothing is stored there.
    async fn read(&self, path: &StorePath, query: Option<&ChildQuery>) -> BoardResult<Value>;

    /// Append `document` under a generated key and return the key
    async fn create(&self, path: &StorePath, document: Value) -> BoardResult<String>;

    /// Write `value` at exactly `path`
    async fn overwrite(&self, path: &StorePath, value: Value) -> BoardResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_should_render_rest_urls() {
        let id = PostId::new("-Nabc");
        assert_eq!(
            StorePath::post_likes(&id).to_url("https://board.example/"),
            "https://board.example/posts/-Nabc/likes.json"
        );
        assert_eq!(
            StorePath::comments(&id).to_url("https://board.example"),
            "https://board.example/comments/-Nabc.json"
        );
        assert_eq!(
            StorePath::post_comments_count(&id).to_string(),
            "posts/-Nabc/comments_count"
        );
    }
}
