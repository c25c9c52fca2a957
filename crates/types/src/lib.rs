//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, UI rendering, AI protocol).
//!
//! # Score Sheet Dimensions
//!
//! Ten-pin sheet geometry:
//!
//! - **Frames**: 10 per player (indexed 0-9)
//! - **Rolls**: 2 per regular frame, up to 3 in the final frame
//! - **Pins**: a roll knocks down 0..=10 pins
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `DEFAULT_AUTO_ROLL_MS` | 350 | Interval between auto-roll advances |
//!
//! # Examples
//!
//! ```
//! use tui_bowling_types::{GameAction, Roll, FRAME_COUNT, PIN_COUNT};
//!
//! // Parse game action (case-insensitive)
//! let action = GameAction::from_str("addPlayer").unwrap();
//! assert_eq!(action, GameAction::AddPlayer);
//! assert_eq!(action.as_str(), "addPlayer");
//!
//! // Sheet geometry
//! assert_eq!(FRAME_COUNT, 10);
//! assert_eq!(PIN_COUNT, 10);
//!
//! let roll: Roll = 7;
//! assert!(roll <= PIN_COUNT);
//! ```

/// Frames on one score sheet (10)
pub const FRAME_COUNT: usize = 10;

/// Index of the final frame (9)
pub const FINAL_FRAME_INDEX: usize = 9;

/// Maximum rolls in a regular frame (2)
pub const REGULAR_FRAME_MAX_ROLLS: usize = 2;

/// Maximum rolls in the final frame (3)
pub const FINAL_FRAME_MAX_ROLLS: usize = 3;

/// Pins standing at the top of a frame (10)
pub const PIN_COUNT: u8 = 10;

/// Exclusive upper bound for a fresh roll (11, so results are 0..=10)
pub const ROLL_UPPER_BOUND: u8 = 11;

/// Maximum rolls one sheet can hold (9 regular frames x 2 + final frame x 3)
pub const MAX_ROLLS_PER_GAME: usize = 21;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Auto-roll interval in milliseconds (350ms between advances)
pub const DEFAULT_AUTO_ROLL_MS: u32 = 350;

/// A single roll: the number of pins knocked down (0..=10).
pub type Roll = u8;

/// Game actions that can be applied to modify game state
///
/// These actions are used by both human input and AI control.
/// Each action maps to a specific game mechanic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Record one roll for the current player (turn may pass)
    Advance,
    /// Append a player to the roster and restart all sheets
    AddPlayer,
    /// Wipe every sheet and hand the first player the lane again
    Restart,
}

impl GameAction {
    /// Parse action from string (for AI protocol)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_bowling_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("advance"), Some(GameAction::Advance));
    /// assert_eq!(GameAction::from_str("addPlayer"), Some(GameAction::AddPlayer));
    /// assert_eq!(GameAction::from_str("restart"), Some(GameAction::Restart));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "advance" => Some(GameAction::Advance),
            "addplayer" => Some(GameAction::AddPlayer),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string for AI protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Advance => "advance",
            GameAction::AddPlayer => "addPlayer",
            GameAction::Restart => "restart",
        }
    }
}
