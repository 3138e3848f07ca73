//! # View Events
//!
//! Events telling the presentation layer what needs redrawing and which
//! notices to show.

use crate::board::models::PostId;

/// How a notice should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Blocking alert, e.g. a failed submit
    Alert,
    /// Short-lived message, e.g. a rolled-back like
    Transient,
}

/// User-facing message raised by the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn alert(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Alert,
            message: message.into(),
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Transient,
            message: message.into(),
        }
    }
}

/// Events emitted by the feed when display state changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// The whole feed was replaced (reload, error panel, empty state)
    FeedRedrawRequired,

    /// A single post's header or counters changed
    PostRedrawRequired { post_id: PostId },

    /// A post's comment thread opened, closed or gained an entry
    ThreadRedrawRequired { post_id: PostId },

    /// A composer's buffer, panels or submit state changed
    ComposerRedrawRequired { post_id: Option<PostId> },

    /// A notice should be shown
    NoticeRaised(Notice),
}
