//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and simulation logic.
//! It has **zero dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games (for AI training)
//! - **Testable**: Roll sources are injected, so whole games can be scripted
//! - **Portable**: Can run in any environment (terminal, headless, adapter-driven)
//! - **Fast**: Zero-allocation hot paths for advancing and snapshotting
//!
//! # Module Structure
//!
//! - [`frame`]: Score sheet data model (frames, players, active-frame scan)
//! - [`game_state`]: Turn state machine, roster management, lane passing
//! - [`rng`]: Roll generation with the pin-remaining constraint
//! - [`scoring`]: One-pass frame scoring with single-frame lookahead
//! - [`snapshot`]: Read-only views for rendering and the AI protocol
//!
//! # Game Rules
//!
//! House rules, deliberately simpler than regulation ten-pin:
//!
//! - **Two rolls per regular frame**, always; a strike forces the second
//!   roll to 0 rather than skipping it
//! - **Final frame** earns a third roll on any strike or a spare
//! - **One frame of lookahead** when scoring strikes and spares; bonuses
//!   never chain across multiple frames
//! - **Joining restarts**: adding a player wipes every sheet
//!
//! # Example
//!
//! ```
//! use tui_bowling_core::GameState;
//! use tui_bowling_types::GameAction;
//!
//! // Create and start a game (seats "Player 1")
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! // Bowl a full frame
//! game.apply_action(GameAction::Advance);
//! game.apply_action(GameAction::Advance);
//!
//! let snapshot = game.snapshot();
//! assert_eq!(snapshot.players.len(), 1);
//! assert_eq!(snapshot.players[0].frames[0].rolls.len(), 2);
//! ```

pub mod frame;
pub mod game_state;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tui_bowling_types as types;

// Re-export commonly used types for convenience
pub use frame::{Frame, Player};
pub use game_state::GameState;
pub use rng::{effective_bound, generate_roll, ConstantSource, RollSource, SequenceSource, SimpleRng};
pub use scoring::{has_strike, is_spare, is_strike, rescore_frames, total_score};
pub use snapshot::{FrameSnapshot, PlayerSnapshot, RosterSnapshot};
