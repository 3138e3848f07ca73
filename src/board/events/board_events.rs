//! # Board Events
//!
//! Named requests produced by feed controls. Controls only describe what
//! the user asked for; the feed decides how to apply it.

use crate::board::models::PostId;

/// Events that controls produce to request changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// Request a fresh copy of the feed
    FeedReloadRequested,

    /// Heart clicked on a post
    LikeClicked { post_id: PostId },

    /// Comment icon clicked; opens or closes the thread
    CommentToggleRequested { post_id: PostId },

    /// Send pressed in a thread's composer
    CommentSubmitRequested { post_id: PostId },

    /// Send pressed in the new-post composer
    PostSubmitRequested,
}

impl BoardEvent {
    /// Post the event targets, if any
    pub fn post_id(&self) -> Option<&PostId> {
        match self {
            BoardEvent::LikeClicked { post_id }
            | BoardEvent::CommentToggleRequested { post_id }
            | BoardEvent::CommentSubmitRequested { post_id } => Some(post_id),
            BoardEvent::FeedReloadRequested | BoardEvent::PostSubmitRequested => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_scoped_events_should_expose_their_post() {
        let id = PostId::new("-N1");
        assert_eq!(
            BoardEvent::LikeClicked {
                post_id: id.clone()
            }
            .post_id(),
            Some(&id)
        );
        assert_eq!(BoardEvent::PostSubmitRequested.post_id(), None);
    }
}
