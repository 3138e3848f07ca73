//! # Controllers Module
//!
//! Contains the controller that connects command-line requests to the feed.

pub mod app_controller;

// Re-export main types for convenience
pub use app_controller::{parse_media_spec, run_offline, AppController};
