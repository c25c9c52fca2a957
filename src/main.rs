//! Terminal bowling runner (default binary).
//!
//! This is the primary gameplay entrypoint.
//! It uses crossterm for input and a custom framebuffer-based renderer
//! (no ratatui widgets/layout), and hosts the AI control adapter when enabled.

use std::sync::atomic::Ordering;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use tui_bowling::adapter::{
    create_ack, create_error, observation_line, Adapter, ClientCommand, ErrorCode, InboundPayload,
    OutboundMessage,
};
use tui_bowling::core::{GameState, RosterSnapshot};
use tui_bowling::input::{handle_key_event, is_auto_roll_toggle, should_quit, AutoRoll};
use tui_bowling::term::{
    AdapterStatusView, FrameBuffer, ScoreboardView, TerminalRenderer, Viewport,
};
use tui_bowling::types::{GameAction, TICK_MS};

fn main() -> Result<()> {
    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer) -> Result<()> {
    let mut game_state = GameState::new(session_seed());
    game_state.start();

    let mut adapter = Adapter::start_from_env();
    let view = ScoreboardView::default();
    let mut pacer = AutoRoll::new();

    let mut fb = FrameBuffer::new(80, 24);
    let mut snap = RosterSnapshot::default();
    let mut obs_seq: u64 = 0;

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        game_state.snapshot_into(&mut snap);
        let status = adapter_status(adapter.as_ref());
        view.render_into_with_adapter(&snap, status.as_ref(), Viewport::new(w, h), &mut fb);
        term.present(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        let mut changed = false;

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if is_auto_roll_toggle(key) {
                            pacer.toggle();
                        } else if let Some(action) = handle_key_event(key) {
                            changed |= game_state.apply_action(action);
                            if action == GameAction::Advance {
                                // A manual roll restarts the auto-roll countdown.
                                pacer.defer();
                            }
                        }
                    }
                    KeyEventKind::Repeat | KeyEventKind::Release => {
                        // A held key should not machine-gun rolls.
                    }
                },
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();

            for action in pacer.update(TICK_MS) {
                changed |= game_state.apply_action(action);
            }
        }

        // AI adapter commands.
        if let Some(adapter) = adapter.as_mut() {
            while let Some(cmd) = adapter.try_recv() {
                match cmd.payload {
                    InboundPayload::Command(ClientCommand::Actions(actions)) => {
                        for action in actions {
                            changed |= game_state.apply_action(action);
                            if action == GameAction::Advance {
                                pacer.defer();
                            }
                        }
                        adapter.send(OutboundMessage::Ack {
                            client_id: cmd.client_id,
                            ack: create_ack(cmd.seq),
                        });
                    }
                    InboundPayload::SnapshotRequest => {
                        game_state.snapshot_into(&mut snap);
                        obs_seq += 1;
                        match observation_line(obs_seq, &snap) {
                            Some(line) => adapter.send(OutboundMessage::ToClient {
                                client_id: cmd.client_id,
                                line,
                            }),
                            None => adapter.send(OutboundMessage::Error {
                                client_id: cmd.client_id,
                                err: create_error(
                                    cmd.seq,
                                    ErrorCode::Internal,
                                    "Snapshot serialization failed",
                                ),
                            }),
                        }
                    }
                }
            }

            // One observation per loop covers every action applied above,
            // whatever its source. Skip the encode when nobody is streaming.
            if changed && adapter.stats().streaming.load(Ordering::Relaxed) > 0 {
                game_state.snapshot_into(&mut snap);
                obs_seq += 1;
                if let Some(line) = observation_line(obs_seq, &snap) {
                    adapter.send(OutboundMessage::Broadcast { line });
                }
            }
        }
    }
}

fn adapter_status(adapter: Option<&Adapter>) -> Option<AdapterStatusView> {
    let adapter = adapter?;
    let stats = adapter.stats();
    Some(AdapterStatusView {
        enabled: true,
        client_count: stats.clients.load(Ordering::Relaxed) as u16,
        controller_id: stats.controller_id(),
        streaming_count: stats.streaming.load(Ordering::Relaxed) as u16,
    })
}

fn session_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u32)
        .unwrap_or(1)
}
