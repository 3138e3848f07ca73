//! # Markup
//!
//! Inline media tag codec and the text-to-display pipeline built on it.

pub mod engine;
pub mod media_tag;
pub mod video;

pub use engine::{escape_angle_brackets, render, DisplayFragment, MarkupEngine};
pub use media_tag::{decode, encode, TagSegment};
pub use video::VideoLink;
