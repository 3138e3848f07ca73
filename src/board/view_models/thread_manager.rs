//! # Threads and Submits
//!
//! Comment threads, comment and post submission, and dispatch of named
//! board events onto the feed.
//!
//! New comments are appended to the open thread without a reload, while a
//! new post always triggers a full feed reload.

use super::core::{CommentThread, FeedRenderer};
use super::time_ago::now_seconds;
use crate::board::composer::Composer;
use crate::board::error::{BoardError, BoardResult};
use crate::board::events::{BoardEvent, Notice, ViewEvent};
use crate::board::models::{Comment, CommentId, NewComment, NewPost, PostId};

impl FeedRenderer {
    /// Open a closed thread (fetching its comments) or close an open one
    pub async fn toggle_comments(&mut self, post_id: &PostId) -> BoardResult<()> {
        let Some(entry) = self.entry_mut(post_id) else {
            tracing::debug!("Toggle ignored for unknown post {}", post_id);
            return Ok(());
        };
        if entry.thread.take().is_some() {
            tracing::debug!("Closed thread for {}", post_id);
            self.emit_view_event(ViewEvent::ThreadRedrawRequired {
                post_id: post_id.clone(),
            });
            return Ok(());
        }

        let comments = match self.feed_store.load_comments(post_id).await {
            Ok(comments) => comments,
            Err(e) => {
                tracing::error!("Failed to load comments for {}: {}", post_id, e);
                self.raise_notice(Notice::alert("Error loading comments."));
                return Err(e);
            }
        };

        let mut composer = Composer::new(self.catalog.clone());
        composer.set_author(self.composer.author().to_string());
        if let Some(entry) = self.entry_mut(post_id) {
            tracing::debug!("Opened thread for {} with {} comments", post_id, comments.len());
            entry.thread = Some(CommentThread { comments, composer });
        }
        self.emit_view_event(ViewEvent::ThreadRedrawRequired {
            post_id: post_id.clone(),
        });
        Ok(())
    }

    /// Send the text of an open thread's composer as a new comment.
    ///
    /// Blank input is rejected before any network call and leaves the
    /// buffer untouched. On success the comment is appended to the thread
    /// and the new count is queued.
    pub async fn submit_comment(&mut self, post_id: &PostId) -> BoardResult<CommentId> {
        let composer = self.thread_composer_mut(post_id).ok_or_else(|| {
            BoardError::Validation(format!("Comments for {post_id} are not open"))
        })?;
        let body = composer.begin_submit()?;
        let comment = NewComment {
            author: composer.display_author(),
            body,
            created_at: now_seconds(),
        };
        self.emit_view_event(ViewEvent::ComposerRedrawRequired {
            post_id: Some(post_id.clone()),
        });

        let result = self.feed_store.create_comment(post_id, &comment).await;

        // The thread may have been closed while the request was in flight
        let Some(entry) = self.entry_mut(post_id) else {
            return result;
        };
        let Some(thread) = entry.thread.as_mut() else {
            return result;
        };
        thread.composer.finish_submit(&result);

        let comment_id = match result {
            Ok(id) => id,
            Err(e) => {
                tracing::error!("Failed to send comment on {}: {}", post_id, e);
                self.raise_notice(Notice::alert("Error sending comment"));
                self.emit_view_event(ViewEvent::ComposerRedrawRequired {
                    post_id: Some(post_id.clone()),
                });
                return Err(e);
            }
        };

        thread.comments.push(Comment {
            id: comment_id.clone(),
            post_id: post_id.clone(),
            author: comment.author,
            body: comment.body,
            created_at: comment.created_at,
        });
        let next = thread.comments.len() as u64;
        let previous = entry.post.comment_count;
        entry.post.comment_count = next;

        self.emit_view_event(ViewEvent::ThreadRedrawRequired {
            post_id: post_id.clone(),
        });
        self.emit_view_event(ViewEvent::PostRedrawRequired {
            post_id: post_id.clone(),
        });
        self.emit_view_event(ViewEvent::ComposerRedrawRequired {
            post_id: Some(post_id.clone()),
        });

        if let Err(e) = self.enqueue_comment_count(post_id, previous, next) {
            tracing::warn!("Could not queue comment count for {}: {}", post_id, e);
            if let Some(entry) = self.entry_mut(post_id) {
                entry.post.comment_count = previous;
            }
            self.raise_notice(Notice::transient("Could not update the comment count."));
        }
        Ok(comment_id)
    }

    /// Send the post composer's text as a new post, then reload the feed
    pub async fn submit_post(&mut self) -> BoardResult<PostId> {
        let body = self.composer.begin_submit()?;
        let post = NewPost {
            author: self.composer.display_author(),
            body,
            created_at: now_seconds(),
        };
        self.emit_view_event(ViewEvent::ComposerRedrawRequired { post_id: None });

        let result = self.feed_store.create_post(&post).await;
        self.composer.finish_submit(&result);
        self.emit_view_event(ViewEvent::ComposerRedrawRequired { post_id: None });

        match result {
            Ok(post_id) => {
                tracing::info!("Created post {}", post_id);
                // A failed reload already shows the error panel
                if let Err(e) = self.load_feed().await {
                    tracing::warn!("Reload after posting failed: {}", e);
                }
                Ok(post_id)
            }
            Err(e) => {
                tracing::error!("Failed to send post: {}", e);
                self.raise_notice(Notice::alert("Error sending post"));
                Err(e)
            }
        }
    }

    /// Apply a board event. Rejected input is not an error here; it simply
    /// leaves state as it was.
    pub async fn handle_event(&mut self, event: &BoardEvent) -> BoardResult<()> {
        tracing::debug!("Handling board event: {:?}", event);
        let result = match event {
            BoardEvent::FeedReloadRequested => self.load_feed().await,
            BoardEvent::LikeClicked { post_id } => self.like(post_id).map(|_| ()),
            BoardEvent::CommentToggleRequested { post_id } => self.toggle_comments(post_id).await,
            BoardEvent::CommentSubmitRequested { post_id } => {
                self.submit_comment(post_id).await.map(|_| ())
            }
            BoardEvent::PostSubmitRequested => self.submit_post().await.map(|_| ()),
        };

        match result {
            Err(e) if e.is_validation() => {
                tracing::debug!("Ignoring rejected input: {}", e);
                Ok(())
            }
            other => other,
        }
    }
}
