//! # Core Event Types
//!
//! Common types used throughout the event system: caret positions and the
//! composer's tab selection.

/// Logical position in composer text (line and character column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LogicalPosition {
    pub line: usize,
    pub column: usize,
}

impl LogicalPosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub fn zero() -> Self {
        Self::new(0, 0)
    }
}

/// Which composer tab is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeTab {
    #[default]
    Write,
    Preview,
}

impl ComposeTab {
    pub fn toggled(self) -> Self {
        match self {
            ComposeTab::Write => ComposeTab::Preview,
            ComposeTab::Preview => ComposeTab::Write,
        }
    }
}
