//! Adapter module - AI control via TCP socket with JSON protocol
//!
//! This module enables external AI agents to play the bowling game through a
//! TCP socket connection, alongside (or instead of) the keyboard.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:43127)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller
//! 4. **Observation Streaming**: Server sends a roster observation after every
//!    applied command (and on request at handshake)
//! 5. **Commanding**: Controller sends commands to execute game actions
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Initial handshake with client info and requested capabilities
//! - **command**: Execute game actions (advance, addPlayer, restart)
//! - **control**: Claim or release controller status
//!
//! ## Server → Client
//!
//! - **welcome**: Response to hello with server capabilities and assigned role
//! - **observation**: Full roster snapshot (sheets, totals, current player)
//! - **ack**: Command acknowledgment, sent once the game loop applied it
//! - **error**: Error response with code and message
//!
//! # Environment Variables
//!
//! Configure the adapter using environment variables:
//!
//! - `BOWLING_AI_HOST`: Bind address (default: "127.0.0.1")
//! - `BOWLING_AI_PORT`: Port number (default: 43127, 0 picks an ephemeral port)
//! - `BOWLING_AI_MAX_PENDING`: Command queue depth before backpressure (default: 64)
//! - `BOWLING_AI_DISABLED`: Set to "1" or "true" to disable adapter entirely
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1234567890,"client":{"name":"my-ai","version":"1.0.0"},...}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1234567890,"protocol_version":"1.0.0",...}
//! Server -> Client: {"type":"observation","seq":2,"ts":1234567891,"players":[...],"current_player":0,...}
//! Client -> Server: {"type":"command","seq":2,"ts":1234567892,"mode":"action","actions":["advance"]}
//! Server -> Client: {"type":"ack","seq":2,"ts":1234567892,"status":"ok"}
//! ```
//!
//! # Implementation
//!
//! - Uses **tokio** for async networking
//! - Multiple clients can connect (only one controller at a time)
//! - Controller can release control for another client to take over
//! - See [`protocol`] for message structure definitions
//! - See [`server`] for TCP server implementation
//!
//! # Testing
//!
//! Connect to the adapter using netcat for manual testing:
//!
//! ```bash
//! nc 127.0.0.1 43127
//! {"type":"hello","seq":1,"ts":1234567890,"client":{"name":"test","version":"1.0.0"},"protocol_version":"1.0.0","formats":["json"],"requested":{"stream_observations":true,"command_mode":"action"}}
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;

pub use tui_bowling_core as core;
pub use tui_bowling_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use runtime::{Adapter, ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
pub use server::*;
