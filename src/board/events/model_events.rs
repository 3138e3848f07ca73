//! # Composer Events
//!
//! Events emitted when a composer's text buffer or panels change state.

use super::types::{ComposeTab, LogicalPosition};
use crate::board::models::MediaReference;

/// Events emitted by `Composer` and its buffer
#[derive(Debug, Clone, PartialEq)]
pub enum ComposerEvent {
    /// Caret moved
    CursorMoved {
        old_pos: LogicalPosition,
        new_pos: LogicalPosition,
    },

    /// Text was inserted at the caret
    TextInserted {
        position: LogicalPosition,
        text: String,
    },

    /// A catalog reference was picked and its tag inserted
    MediaTagInserted {
        position: LogicalPosition,
        reference: MediaReference,
    },

    /// Write/Preview tab switched
    TabChanged { old_tab: ComposeTab, new_tab: ComposeTab },

    /// Buffer emptied after a successful submit
    BufferCleared,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_inserted_event_should_carry_text_data() {
        let event = ComposerEvent::TextInserted {
            position: LogicalPosition::zero(),
            text: "hello".to_string(),
        };

        match event {
            ComposerEvent::TextInserted { text, .. } => {
                assert_eq!(text, "hello");
            }
            _ => panic!("Expected TextInserted event"),
        }
    }

    #[test]
    fn tab_changed_event_should_carry_tab_data() {
        let event = ComposerEvent::TabChanged {
            old_tab: ComposeTab::Write,
            new_tab: ComposeTab::Preview,
        };

        match event {
            ComposerEvent::TabChanged { old_tab, new_tab } => {
                assert_eq!(old_tab, ComposeTab::Write);
                assert_eq!(new_tab, ComposeTab::Preview);
            }
            _ => panic!("Expected TabChanged event"),
        }
    }
}
