//! # Buffer Models
//!
//! Composer text storage with a caret. Columns count characters, not bytes,
//! so emoji and accented titles can be inserted anywhere.

use crate::board::events::{ComposerEvent, LogicalPosition};

/// Byte index of the `column`-th character of `line`, clamped to its end
fn byte_index(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map_or(line.len(), |(idx, _)| idx)
}

/// Content of a text buffer
#[derive(Debug, Clone, PartialEq)]
pub struct BufferContent {
    lines: Vec<String>,
}

impl BufferContent {
    /// Create new empty buffer
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }

    /// Get all lines as slice
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Get number of lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get line length (character count)
    pub fn line_length(&self, index: usize) -> usize {
        self.lines
            .get(index)
            .map_or(0, |line| line.chars().count())
    }

    /// Insert text at position, returning event
    pub fn insert_text(&mut self, position: LogicalPosition, text: &str) -> ComposerEvent {
        let position = self.clamp_position(position);
        let current_line = &mut self.lines[position.line];
        let split_at = byte_index(current_line, position.column);

        if text.contains('\n') {
            let after_cursor = current_line.split_off(split_at);
            let text_lines: Vec<&str> = text.split('\n').collect();
            current_line.push_str(text_lines[0]);

            for (i, line) in text_lines.iter().enumerate().skip(1) {
                if i == text_lines.len() - 1 {
                    // Last line - append the text that was after cursor
                    let mut last_line = line.to_string();
                    last_line.push_str(&after_cursor);
                    self.lines.insert(position.line + i, last_line);
                } else {
                    self.lines.insert(position.line + i, line.to_string());
                }
            }
        } else {
            current_line.insert_str(split_at, text);
        }

        ComposerEvent::TextInserted {
            position,
            text: text.to_string(),
        }
    }

    /// Clamp position to valid bounds
    pub fn clamp_position(&self, position: LogicalPosition) -> LogicalPosition {
        let line = position.line.min(self.lines.len().saturating_sub(1));
        let column = position.column.min(self.line_length(line));
        LogicalPosition::new(line, column)
    }

    /// Convert a character offset into the whole text to a position
    pub fn position_at_offset(&self, offset: usize) -> LogicalPosition {
        let mut remaining = offset;
        for (index, line) in self.lines.iter().enumerate() {
            let length = line.chars().count();
            if remaining <= length {
                return LogicalPosition::new(index, remaining);
            }
            // +1 for the newline joining this line to the next
            remaining -= length + 1;
        }
        let last = self.lines.len() - 1;
        LogicalPosition::new(last, self.line_length(last))
    }

    /// Character offset of a position into the whole text
    pub fn offset_of(&self, position: LogicalPosition) -> usize {
        let position = self.clamp_position(position);
        self.lines[..position.line]
            .iter()
            .map(|line| line.chars().count() + 1)
            .sum::<usize>()
            + position.column
    }

    /// Get text content as single string
    pub fn get_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Set entire content from string
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(|s| s.to_string()).collect();
    }

    /// True when the buffer holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }
}

impl Default for BufferContent {
    fn default() -> Self {
        Self::new()
    }
}

/// Text buffer with a caret
#[derive(Debug, Clone, Default)]
pub struct BufferModel {
    content: BufferContent,
    cursor: LogicalPosition,
}

impl BufferModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get buffer content
    pub fn content(&self) -> &BufferContent {
        &self.content
    }

    /// Get current cursor position
    pub fn cursor(&self) -> LogicalPosition {
        self.cursor
    }

    /// Caret as a character offset into the whole text
    pub fn cursor_offset(&self) -> usize {
        self.content.offset_of(self.cursor)
    }

    /// Set cursor position (clamped to valid bounds)
    pub fn set_cursor(&mut self, position: LogicalPosition) -> Option<ComposerEvent> {
        let old_pos = self.cursor;
        let new_pos = self.content.clamp_position(position);

        if old_pos != new_pos {
            self.cursor = new_pos;
            Some(ComposerEvent::CursorMoved { old_pos, new_pos })
        } else {
            None
        }
    }

    /// Place the caret at a character offset, as a text area reports it
    pub fn set_cursor_offset(&mut self, offset: usize) -> Option<ComposerEvent> {
        let position = self.content.position_at_offset(offset);
        self.set_cursor(position)
    }

    /// Insert text at cursor and move the cursor past it
    pub fn insert_text(&mut self, text: &str) -> ComposerEvent {
        let offset = self.cursor_offset();
        let event = self.content.insert_text(self.cursor, text);
        self.cursor = self
            .content
            .position_at_offset(offset + text.chars().count());
        event
    }

    /// Replace the whole text, leaving the caret at the end
    pub fn set_text(&mut self, text: &str) {
        self.content.set_text(text);
        let end = text.chars().count();
        self.cursor = self.content.position_at_offset(end);
    }

    pub fn text(&self) -> String {
        self.content.get_text()
    }

    pub fn clear(&mut self) {
        self.content = BufferContent::new();
        self.cursor = LogicalPosition::zero();
    }
}
