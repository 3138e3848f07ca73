//! # Events Module
//!
//! Re-exports all event system components organized by category.

pub mod board_events;
pub mod event_bus;
pub mod model_events;
pub mod types;
pub mod view_events;

pub use board_events::BoardEvent;
pub use event_bus::{BoardEventHandler, EventBus, SimpleEventBus, ViewEventHandler};
pub use model_events::ComposerEvent;
pub use types::{ComposeTab, LogicalPosition};
pub use view_events::{Notice, NoticeKind, ViewEvent};
