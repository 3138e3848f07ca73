//! # Post and Comment Models
//!
//! In-memory feed entries plus the document shapes stored remotely.

use super::media::MediaItem;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name used when the author left the name blank
pub const ANONYMOUS: &str = "Anonymous";

/// Store-assigned post key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostId(String);

/// Store-assigned comment key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommentId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl CommentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Top-level feed entry
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub author: String,
    /// Raw, unrendered body text
    pub body: String,
    /// Seconds since epoch
    pub created_at: i64,
    pub like_count: u64,
    pub comment_count: u64,
}

/// Reply attached to exactly one post
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author: String,
    pub body: String,
    pub created_at: i64,
}

/// Post document as stored under `posts/{id}`
///
/// Older boards wrote `user`, `commentCount` and an `item` object instead of
/// free text, so those shapes are accepted on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    #[serde(alias = "user", default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing)]
    pub item: Option<MediaItem>,
    pub timestamp: i64,
    #[serde(default)]
    pub likes: u64,
    #[serde(alias = "commentCount", default)]
    pub comments_count: u64,
}

/// Comment document as stored under `comments/{postId}/{commentId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRecord {
    #[serde(default)]
    pub username: String,
    pub text: String,
    pub timestamp: i64,
}

/// Author-supplied content for a new post
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub author: String,
    pub body: String,
    pub created_at: i64,
}

/// Author-supplied content for a new comment
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub author: String,
    pub body: String,
    pub created_at: i64,
}

/// Normalize a self-reported display name
pub fn display_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        ANONYMOUS.to_string()
    } else {
        trimmed.to_string()
    }
}

impl From<&NewPost> for PostRecord {
    fn from(post: &NewPost) -> Self {
        Self {
            username: post.author.clone(),
            text: Some(post.body.clone()),
            item: None,
            timestamp: post.created_at,
            likes: 0,
            comments_count: 0,
        }
    }
}

impl From<&NewComment> for CommentRecord {
    fn from(comment: &NewComment) -> Self {
        Self {
            username: comment.author.clone(),
            text: comment.body.clone(),
            timestamp: comment.created_at,
        }
    }
}

impl CommentRecord {
    pub fn into_comment(self, id: CommentId, post_id: PostId) -> Comment {
        Comment {
            id,
            post_id,
            author: display_name(&self.username),
            body: self.text,
            created_at: self.timestamp,
        }
    }
}
