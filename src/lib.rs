//! # MediaBoard - Discussion Board with Inline Media References
//!
//! A feed of short posts and comment threads backed by a realtime JSON
//! document store. Post text can carry inline catalog references
//! (`[MEDIA:movie:tmdb:603:The Matrix:completed]`), markdown-style links and
//! video links, all rendered to display markup by a fixed pipeline.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  BoardEvents ┌──────────────┐   reads/creates  ┌───────────┐
//! │ Controller  │─────────────▶│ FeedRenderer │─────────────────▶│ FeedStore │
//! │             │              │              │                  │           │
//! │ - CLI       │◀─────────────│ - feed cache │   counter writes │ - layout  │
//! │ - Event bus │  ViewEvents  │ - threads    │──┐               │ - decode  │
//! └─────────────┘              │ - composers  │  │  ┌──────────┐ └───────────┘
//!                              └──────────────┘  └─▶│ Mutation │──────▲
//!                                                   │  Queue   │
//!                                                   └──────────┘
//! ```
//!
//! Counter writes (likes, comment counts) are applied optimistically and
//! then written through one serial queue per feed, in click order.

pub mod board;
pub mod cmd_args;
pub mod config;

// Re-export main types for easy access
pub use board::*;
