//! Terminal rendering for the bowling score sheet.
//!
//! This is a small, game-oriented rendering layer: views draw into a plain
//! framebuffer, and a double-buffered renderer flushes only the dirty runs to
//! the terminal.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Render the sheet without per-frame allocation
//! - Degrade gracefully on small viewports (clip, never panic)

pub mod fb;
pub mod renderer;
pub mod scoreboard;

pub use tui_bowling_core as core;
pub use tui_bowling_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::{encode_dirty_runs, encode_full, TerminalRenderer};
pub use scoreboard::{roll_glyph, AdapterStatusView, AnchorY, ScoreboardView, Viewport};
