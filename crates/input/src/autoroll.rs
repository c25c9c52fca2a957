//! Auto-roll pacer: advances the game on a fixed cadence.
//!
//! Terminals deliver key presses, not a clock, so pacing lives here as a
//! millisecond accumulator fed from the main loop's tick. When enabled, the
//! pacer emits one [`GameAction::Advance`] per elapsed interval, with a small
//! catch-up cap so a stalled terminal cannot queue an avalanche of rolls.

use arrayvec::ArrayVec;

use crate::types::{GameAction, DEFAULT_AUTO_ROLL_MS};

/// Most advances a single `update` call may emit.
const MAX_CATCH_UP: usize = 4;

#[derive(Debug, Clone)]
pub struct AutoRoll {
    enabled: bool,
    interval_ms: u32,
    elapsed_ms: u32,
}

impl AutoRoll {
    pub fn new() -> Self {
        Self {
            enabled: false,
            interval_ms: DEFAULT_AUTO_ROLL_MS,
            elapsed_ms: 0,
        }
    }

    pub fn with_interval(mut self, interval_ms: u32) -> Self {
        // A zero interval would spin; clamp to one tick.
        self.interval_ms = interval_ms.max(1);
        self
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the pacer on or off. The countdown restarts from zero.
    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
        self.elapsed_ms = 0;
    }

    /// Restart the countdown, e.g. after a manual roll.
    pub fn defer(&mut self) {
        self.elapsed_ms = 0;
    }

    /// Advance the pacer by `elapsed_ms` and collect due actions.
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<GameAction, MAX_CATCH_UP> {
        let mut actions = ArrayVec::new();
        if !self.enabled {
            return actions;
        }

        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        while self.elapsed_ms >= self.interval_ms && !actions.is_full() {
            self.elapsed_ms -= self.interval_ms;
            actions.push(GameAction::Advance);
        }

        // Drop any backlog beyond the cap instead of carrying it forward.
        if actions.is_full() {
            self.elapsed_ms = 0;
        }
        actions
    }
}

impl Default for AutoRoll {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_pacer_emits_nothing() {
        let mut pacer = AutoRoll::new().with_interval(100);
        assert!(pacer.update(1000).is_empty());
    }

    #[test]
    fn test_emits_after_interval() {
        let mut pacer = AutoRoll::new().with_interval(100);
        pacer.toggle();

        assert!(pacer.update(99).is_empty());
        let actions = pacer.update(1);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0], GameAction::Advance);

        // Remainder carries over.
        assert!(pacer.update(50).is_empty());
        assert_eq!(pacer.update(50).len(), 1);
    }

    #[test]
    fn test_catch_up_is_capped() {
        let mut pacer = AutoRoll::new().with_interval(100);
        pacer.toggle();

        let actions = pacer.update(10_000);
        assert_eq!(actions.len(), MAX_CATCH_UP);
        // Backlog was dropped, not deferred.
        assert!(pacer.update(99).is_empty());
    }

    #[test]
    fn test_toggle_restarts_countdown() {
        let mut pacer = AutoRoll::new().with_interval(100);
        pacer.toggle();
        pacer.update(80);

        pacer.toggle();
        pacer.toggle();
        assert!(pacer.update(80).is_empty());
        assert_eq!(pacer.update(20).len(), 1);
    }

    #[test]
    fn test_defer_after_manual_roll() {
        let mut pacer = AutoRoll::new().with_interval(100);
        pacer.toggle();
        pacer.update(90);

        pacer.defer();
        assert!(pacer.update(90).is_empty());
        assert_eq!(pacer.update(10).len(), 1);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let mut pacer = AutoRoll::new().with_interval(0);
        pacer.toggle();
        assert_eq!(pacer.update(2).len(), 2);
    }
}
