//! Terminal input module (engine-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key events into [`crate::types::GameAction`] and provides an
//! auto-roll pacer suitable for terminal environments (where the main loop
//! owns the clock).

pub mod autoroll;
pub mod map;

pub use tui_bowling_types as types;

pub use autoroll::AutoRoll;
pub use map::{handle_key_event, is_auto_roll_toggle, should_quit};
