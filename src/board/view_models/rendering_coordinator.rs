//! # Rendering Coordination
//!
//! Handles view event emission and turns the feed state into display
//! markup: post headers, rendered bodies, like and comment controls, and
//! expanded threads with their composers.

use super::core::{CommentThread, FeedRenderer, FeedState, PostEntry};
use super::time_ago::time_ago;
use crate::board::composer::Composer;
use crate::board::events::{ComposeTab, ViewEvent};
use crate::board::markup::escape_angle_brackets;
use crate::board::models::Comment;
use std::fmt::Write;

const HEART: &str = "❤";
const COMMENT_ICON: &str = "💭";

fn escape_attribute(value: &str) -> String {
    escape_angle_brackets(&value.replace('&', "&amp;")).replace('"', "&quot;")
}

/// Counters render empty at zero
fn counter_text(count: u64) -> String {
    if count == 0 {
        String::new()
    } else {
        count.to_string()
    }
}

impl FeedRenderer {
    /// Emit a view event (adds to pending events collection)
    pub(super) fn emit_view_event(&mut self, event: ViewEvent) {
        self.pending_view_events.push(event);
        tracing::debug!("View event emitted: {:?}", self.pending_view_events.last());
    }

    /// Collect and clear pending view events
    pub fn collect_pending_view_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.pending_view_events)
    }

    /// Markup for the whole feed area
    pub fn render_feed(&self, now: i64) -> String {
        match &self.state {
            FeedState::Loading => "<p>Loading posts...</p>".to_string(),
            FeedState::Empty => "<p>No posts yet.</p>".to_string(),
            FeedState::Failed(_) => "<p>Error loading posts.</p>".to_string(),
            FeedState::Loaded => self
                .entries
                .iter()
                .map(|entry| self.render_post(entry, now))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Markup for one post
    pub fn render_post(&self, entry: &PostEntry, now: i64) -> String {
        let post = &entry.post;
        let mut html = String::new();
        let _ = write!(
            html,
            "<div class=\"board-post\" data-post-id=\"{}\">",
            escape_attribute(post.id.as_str())
        );
        let _ = write!(
            html,
            "<p><b>{}</b> {}</p><small>{}</small>",
            escape_angle_brackets(&post.author),
            self.engine.render(&post.body),
            time_ago(post.created_at, now)
        );

        let heart_class = if entry.liked {
            "like-heart liked"
        } else {
            "like-heart"
        };
        let _ = write!(
            html,
            "<div class=\"likes-row\"><span class=\"{}\">{}</span><span class=\"likes-count\">{}</span>\
             <span class=\"comment-icon\">{}</span><span class=\"comments-count\">{}</span></div>",
            heart_class,
            HEART,
            counter_text(post.like_count),
            COMMENT_ICON,
            counter_text(post.comment_count)
        );

        if let Some(thread) = &entry.thread {
            html.push_str(&self.render_thread(thread, now));
        }
        html.push_str("</div>");
        html
    }

    fn render_thread(&self, thread: &CommentThread, now: i64) -> String {
        let mut html = String::from("<div class=\"comments-section\">");
        if thread.comments.is_empty() {
            html.push_str("<div class=\"comment\">No comments yet.</div>");
        } else {
            for comment in &thread.comments {
                html.push_str(&self.render_comment(comment, now));
            }
        }
        html.push_str(&self.render_composer(&thread.composer, "comment-box"));
        html.push_str("</div>");
        html
    }

    fn render_comment(&self, comment: &Comment, now: i64) -> String {
        format!(
            "<div class=\"comment\"><b>{}</b> {} <small>{}</small></div>",
            escape_angle_brackets(&comment.author),
            self.engine.render(&comment.body),
            time_ago(comment.created_at, now)
        )
    }

    /// Markup for a composer box in its current tab
    pub fn render_composer(&self, composer: &Composer, class: &str) -> String {
        let body = match composer.tab() {
            ComposeTab::Write => format!(
                "<textarea class=\"compose-input\">{}</textarea>",
                escape_angle_brackets(&composer.text())
            ),
            ComposeTab::Preview => format!(
                "<div class=\"compose-preview\">{}</div>",
                composer.preview()
            ),
        };
        let disabled = if composer.can_submit() { "" } else { " disabled" };
        let error = composer
            .last_error()
            .map(|e| format!("<p class=\"compose-error\">{}</p>", escape_angle_brackets(e)))
            .unwrap_or_default();
        format!(
            "<div class=\"{class}\">{body}{error}<button class=\"send-btn\"{disabled}>Send</button></div>"
        )
    }

    /// Plain-text listing for terminals
    pub fn render_text(&self, now: i64) -> String {
        match &self.state {
            FeedState::Loading => "Loading posts...".to_string(),
            FeedState::Empty => "No posts yet.".to_string(),
            FeedState::Failed(reason) => format!("Error loading posts. ({reason})"),
            FeedState::Loaded => {
                let mut out = String::new();
                for entry in &self.entries {
                    let post = &entry.post;
                    let heart = if entry.liked { "♥" } else { "♡" };
                    let _ = writeln!(
                        out,
                        "[{}] {} · {} · {} {} · {} {}",
                        post.id,
                        post.author,
                        time_ago(post.created_at, now),
                        heart,
                        post.like_count,
                        COMMENT_ICON,
                        post.comment_count
                    );
                    for line in post.body.lines() {
                        let _ = writeln!(out, "    {line}");
                    }
                    if let Some(thread) = &entry.thread {
                        if thread.comments.is_empty() {
                            let _ = writeln!(out, "    No comments yet.");
                        }
                        for comment in &thread.comments {
                            let _ = writeln!(
                                out,
                                "    > {}: {} ({})",
                                comment.author,
                                comment.body,
                                time_ago(comment.created_at, now)
                            );
                        }
                    }
                }
                out
            }
        }
    }
}
