//! Theme
//!
//! Color constants and styling helpers for the dashboard UI: a dark
//! sidebar/top-bar chrome around a light content area, with per-status
//! badge colors for recordings and transcripts.

pub mod colors;
pub mod styles;

pub use colors::*;
pub use styles::*;
