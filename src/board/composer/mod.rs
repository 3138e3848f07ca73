//! # Composer
//!
//! Authoring state for a post or a comment: the text buffer and its caret,
//! the media-insert workflow, emoji and link insertion, the Write/Preview
//! tab and the submit lifecycle.
//!
//! ```text
//! media panel:  Closed ──open──▶ TypePicking ──type──▶ Searching ──select──▶ Closed
//! tab:          Write ⇄ Preview
//! emoji panel:  closed ⇄ open
//! ```

pub mod emoji;

use crate::board::error::{BoardError, BoardResult};
use crate::board::events::{ComposeTab, ComposerEvent};
use crate::board::markup::{self, DisplayFragment, MarkupEngine};
use crate::board::models::{display_name, BufferModel, Catalog, MediaItem, MediaReference, MediaType};
use std::sync::Arc;

pub use emoji::{emoji_at, EMOJI_PALETTE};

/// State of the media-insert panel
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MediaPanel {
    #[default]
    Closed,
    TypePicking,
    Searching {
        media_type: MediaType,
        query: String,
        results: Vec<MediaItem>,
    },
}

/// Authoring state for one post or comment box
#[derive(Debug, Clone)]
pub struct Composer {
    buffer: BufferModel,
    author: String,
    tab: ComposeTab,
    media_panel: MediaPanel,
    emoji_open: bool,
    submitting: bool,
    last_error: Option<String>,
    catalog: Arc<Catalog>,
    engine: MarkupEngine,
    pending_events: Vec<ComposerEvent>,
}

impl Composer {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            buffer: BufferModel::new(),
            author: String::new(),
            tab: ComposeTab::Write,
            media_panel: MediaPanel::Closed,
            emoji_open: false,
            submitting: false,
            last_error: None,
            catalog,
            engine: MarkupEngine::new(),
            pending_events: Vec::new(),
        }
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn buffer(&self) -> &BufferModel {
        &self.buffer
    }

    /// Replace the text as if the user typed it, caret at the end
    pub fn set_text(&mut self, text: &str) {
        self.buffer.set_text(text);
    }

    pub fn set_cursor_offset(&mut self, offset: usize) {
        if let Some(event) = self.buffer.set_cursor_offset(offset) {
            self.pending_events.push(event);
        }
    }

    /// Insert at the caret, keeping trailing text, and move past the insertion
    pub fn insert_at_cursor(&mut self, fragment: &str) {
        let event = self.buffer.insert_text(fragment);
        self.pending_events.push(event);
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    /// Author as it will be stored, `Anonymous` when left blank
    pub fn display_author(&self) -> String {
        display_name(&self.author)
    }

    // ========== Write / Preview ==========

    pub fn tab(&self) -> ComposeTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: ComposeTab) {
        if self.tab != tab {
            let old_tab = self.tab;
            self.tab = tab;
            self.pending_events.push(ComposerEvent::TabChanged {
                old_tab,
                new_tab: tab,
            });
        }
    }

    pub fn toggle_tab(&mut self) {
        self.set_tab(self.tab.toggled());
    }

    /// Buffer rendered the way the feed will show it
    pub fn preview(&self) -> DisplayFragment {
        self.engine.render(&self.buffer.text())
    }

    // ========== Media insert workflow ==========

    pub fn media_panel(&self) -> &MediaPanel {
        &self.media_panel
    }

    pub fn open_media_panel(&mut self) {
        if self.media_panel == MediaPanel::Closed {
            self.media_panel = MediaPanel::TypePicking;
        }
    }

    /// Pick the type to search; picking again restarts the search
    pub fn choose_media_type(&mut self, media_type: MediaType) {
        if self.media_panel == MediaPanel::Closed {
            return;
        }
        self.media_panel = MediaPanel::Searching {
            media_type,
            query: String::new(),
            results: Vec::new(),
        };
    }

    /// Search the chosen type; empty unless a type has been picked
    pub fn search_media(&mut self, query: &str) -> &[MediaItem] {
        match &mut self.media_panel {
            MediaPanel::Searching {
                media_type,
                query: current,
                results,
            } => {
                *current = query.to_string();
                *results = self.catalog.search(*media_type, query);
                results.as_slice()
            }
            _ => &[],
        }
    }

    /// Insert the tag for the `index`-th search result and close the panel
    pub fn select_media_result(&mut self, index: usize) -> Option<MediaReference> {
        let item = match &self.media_panel {
            MediaPanel::Searching { results, .. } => results.get(index)?.clone(),
            _ => return None,
        };
        Some(self.insert_media(&item))
    }

    /// Insert a catalog item's tag at the caret and close the panel
    pub fn insert_media(&mut self, item: &MediaItem) -> MediaReference {
        let reference = MediaReference::from(item);
        let position = self.buffer.cursor();
        let tag = markup::encode(&reference);
        self.buffer.insert_text(&tag);
        self.media_panel = MediaPanel::Closed;

        tracing::debug!("Inserted media tag for '{}'", reference.title);
        self.pending_events.push(ComposerEvent::MediaTagInserted {
            position,
            reference: reference.clone(),
        });
        reference
    }

    pub fn close_media_panel(&mut self) {
        self.media_panel = MediaPanel::Closed;
    }

    // ========== Emoji and links ==========

    pub fn emoji_panel_open(&self) -> bool {
        self.emoji_open
    }

    pub fn toggle_emoji_panel(&mut self) {
        self.emoji_open = !self.emoji_open;
    }

    /// Insert a palette emoji at the caret and close the panel
    pub fn pick_emoji(&mut self, index: usize) -> Option<&'static str> {
        let emoji = emoji_at(index)?;
        self.insert_at_cursor(emoji);
        self.emoji_open = false;
        Some(emoji)
    }

    pub fn insert_link(&mut self, label: &str, url: &str) {
        self.insert_at_cursor(&format!("[{}]({})", label.trim(), url.trim()));
    }

    // ========== Submit lifecycle ==========

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether the submit control should be enabled
    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.buffer.content().is_blank()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Start a submit, returning the trimmed text to send.
    ///
    /// Blank input and a submit already in flight are rejected without
    /// touching the buffer.
    pub fn begin_submit(&mut self) -> BoardResult<String> {
        if self.submitting {
            return Err(BoardError::Validation(
                "A submit is already in progress".to_string(),
            ));
        }
        let text = self.buffer.text().trim().to_string();
        if text.is_empty() {
            return Err(BoardError::Validation("Nothing to send".to_string()));
        }
        self.submitting = true;
        self.last_error = None;
        Ok(text)
    }

    /// Finish a submit. Success clears the buffer and closes the media
    /// panel; failure keeps the buffer for a retry.
    pub fn finish_submit<T>(&mut self, outcome: &BoardResult<T>) {
        self.submitting = false;
        match outcome {
            Ok(_) => {
                self.buffer.clear();
                self.media_panel = MediaPanel::Closed;
                self.emoji_open = false;
                self.tab = ComposeTab::Write;
                self.pending_events.push(ComposerEvent::BufferCleared);
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Drain events produced since the last call
    pub fn take_events(&mut self) -> Vec<ComposerEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::new(vec![
            MediaItem {
                media_type: MediaType::Movie,
                source: "tmdb".to_string(),
                source_id: "603".to_string(),
                title: "The Matrix".to_string(),
                status: "completed".to_string(),
            },
            MediaItem {
                media_type: MediaType::Tv,
                source: "tmdb".to_string(),
                source_id: "1399_s1".to_string(),
                title: "Game of Thrones: Season 1".to_string(),
                status: "ongoing".to_string(),
            },
        ]))
    }

    #[test]
    fn media_workflow_should_insert_tag_at_caret_and_close_panel() {
        let mut composer = Composer::new(catalog());
        composer.set_text("I loved  today");
        composer.set_cursor_offset(8);

        composer.open_media_panel();
        assert_eq!(composer.media_panel(), &MediaPanel::TypePicking);
        composer.choose_media_type(MediaType::Movie);
        assert_eq!(composer.search_media("matrix").len(), 1);

        let reference = composer.select_media_result(0).unwrap();
        assert_eq!(reference.source_id, "603");
        assert_eq!(
            composer.text(),
            "I loved [MEDIA:movie:tmdb:603:The Matrix:completed] today"
        );
        assert_eq!(composer.media_panel(), &MediaPanel::Closed);
        assert!(composer
            .take_events()
            .iter()
            .any(|e| matches!(e, ComposerEvent::MediaTagInserted { .. })));
    }

    #[test]
    fn search_should_require_a_chosen_type() {
        let mut composer = Composer::new(catalog());
        assert!(composer.search_media("matrix").is_empty());
        composer.open_media_panel();
        assert!(composer.search_media("matrix").is_empty());
        composer.choose_media_type(MediaType::Tv);
        assert!(composer.search_media("matrix").is_empty());
        assert_eq!(composer.search_media("thrones").len(), 1);
    }

    #[test]
    fn titles_with_colons_should_be_escaped_in_the_buffer() {
        let mut composer = Composer::new(catalog());
        composer.open_media_panel();
        composer.choose_media_type(MediaType::Tv);
        composer.search_media("season");
        composer.select_media_result(0);
        assert_eq!(
            composer.text(),
            "[MEDIA:tv:tmdb:1399_s1:Game of Thrones\\: Season 1:ongoing]"
        );
        assert!(composer.preview().as_str().contains("/tmdb/season/1399/1/"));
    }

    #[test]
    fn emoji_pick_should_insert_and_close_panel() {
        let mut composer = Composer::new(catalog());
        composer.set_text("nice");
        composer.toggle_emoji_panel();
        assert!(composer.emoji_panel_open());

        assert_eq!(composer.pick_emoji(21), Some("🔥"));
        assert_eq!(composer.text(), "nice🔥");
        assert!(!composer.emoji_panel_open());
    }

    #[test]
    fn insert_link_should_write_markdown_at_caret() {
        let mut composer = Composer::new(catalog());
        composer.set_text("read this");
        composer.set_cursor_offset(5);
        composer.insert_link("post", "https://example.com");
        assert_eq!(composer.text(), "read [post](https://example.com)this");
    }

    #[test]
    fn tab_toggle_should_emit_events() {
        let mut composer = Composer::new(catalog());
        composer.toggle_tab();
        assert_eq!(composer.tab(), ComposeTab::Preview);
        assert_eq!(
            composer.take_events(),
            vec![ComposerEvent::TabChanged {
                old_tab: ComposeTab::Write,
                new_tab: ComposeTab::Preview
            }]
        );
    }

    #[test]
    fn blank_submit_should_be_rejected_and_keep_buffer() {
        let mut composer = Composer::new(catalog());
        composer.set_text("   \n  ");
        let result = composer.begin_submit();
        assert!(result.unwrap_err().is_validation());
        assert_eq!(composer.text(), "   \n  ");
        assert!(!composer.is_submitting());
    }

    #[test]
    fn submit_should_disable_until_finished() {
        let mut composer = Composer::new(catalog());
        composer.set_text("  hello  ");
        assert_eq!(composer.begin_submit().unwrap(), "hello");
        assert!(composer.is_submitting());
        assert!(!composer.can_submit());
        assert!(composer.begin_submit().is_err());

        composer.finish_submit::<()>(&Ok(()));
        assert!(!composer.is_submitting());
        assert_eq!(composer.text(), "");
    }

    #[test]
    fn failed_submit_should_preserve_buffer_and_record_error() {
        let mut composer = Composer::new(catalog());
        composer.set_text("keep me");
        composer.open_media_panel();
        composer.begin_submit().unwrap();

        composer.finish_submit::<()>(&Err(BoardError::Network("offline".to_string())));

        assert_eq!(composer.text(), "keep me");
        assert_eq!(composer.media_panel(), &MediaPanel::TypePicking);
        assert!(composer.last_error().unwrap().contains("offline"));
        assert!(composer.can_submit());
    }

    #[test]
    fn display_author_should_default_to_anonymous() {
        let mut composer = Composer::new(catalog());
        assert_eq!(composer.display_author(), "Anonymous");
        composer.set_author("  mei ");
        assert_eq!(composer.display_author(), "mei");
    }
}
