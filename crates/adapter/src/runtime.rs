//! Adapter runtime integration.
//!
//! Bridges the sync game loop with the async TCP server.

use std::net::SocketAddr;
use std::sync::Arc;

use arrayvec::ArrayVec;
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, oneshot};

use crate::protocol::{AckMessage, ErrorMessage};
use crate::server::{run_server, AdapterStats, ServerConfig, ServerState};
use crate::types::GameAction;

/// Command delivered to the game loop.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub payload: InboundPayload,
}

#[derive(Debug, Clone)]
pub enum InboundPayload {
    Command(ClientCommand),
    /// Client asked for an immediate observation (hello with streaming on).
    SnapshotRequest,
}

/// Command payload.
#[derive(Debug, Clone)]
pub enum ClientCommand {
    Actions(ArrayVec<GameAction, 32>),
}

/// Outbound message to be delivered by the server.
///
/// Observation lines are shared `Arc<str>` so a broadcast to many clients
/// never re-serializes or copies the payload.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClient { client_id: usize, line: Arc<str> },
    Broadcast { line: Arc<str> },
    Ack { client_id: usize, ack: AckMessage },
    Error { client_id: usize, err: ErrorMessage },
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    listen_addr: SocketAddr,
    stats: Arc<AdapterStats>,
}

impl Adapter {
    /// Start the adapter from environment variables.
    ///
    /// Returns None if `BOWLING_AI_DISABLED` is set or the listener could not
    /// bind its address.
    pub fn start_from_env() -> Option<Self> {
        if ServerState::is_disabled() {
            return None;
        }

        let config = ServerConfig::from_env();
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let (ready_tx, ready_rx) = oneshot::channel();
        let stats = Arc::new(AdapterStats::new());

        let rt = Runtime::new().expect("Failed to create tokio runtime");
        {
            let stats = Arc::clone(&stats);
            rt.spawn(async move {
                if let Err(e) = run_server(config, cmd_tx, out_rx, Some(ready_tx), stats).await {
                    eprintln!("[Adapter] Server error: {}", e);
                }
            });
        }

        // A failed bind drops the sender and the adapter stays off.
        let listen_addr = ready_rx.blocking_recv().ok()?;

        Some(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
            listen_addr,
            stats,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        self.listen_addr
    }

    pub fn stats(&self) -> &AdapterStats {
        &self.stats
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_disabled_via_env() {
        std::env::set_var("BOWLING_AI_DISABLED", "1");
        let adapter = Adapter::start_from_env();
        assert!(adapter.is_none());
        std::env::remove_var("BOWLING_AI_DISABLED");
    }
}
