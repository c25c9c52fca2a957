//! TUI Bowling (workspace facade crate).
//!
//! This package keeps the `tui_bowling::{core,adapter,term,input,types}` public
//! API stable while the implementation lives in dedicated crates under `crates/`.

pub use tui_bowling_adapter as adapter;
pub use tui_bowling_core as core;
pub use tui_bowling_input as input;
pub use tui_bowling_term as term;
pub use tui_bowling_types as types;
