//! RNG module - roll generation with the pin-remaining constraint
//!
//! One draw produces one roll. A fresh frame rolls against the full rack
//! (bound 11, results 0..=10); a follow-up roll in the same frame is clamped
//! to the pins still standing, except when the frame opened with a strike
//! and the rack is back up.
//!
//! Also provides deterministic sources for testing and scripted demos.

use crate::scoring::is_strike;
use crate::types::{Roll, ROLL_UPPER_BOUND};

/// Source of pin counts for the state machine.
///
/// The production implementation is [`SimpleRng`]; tests and demos inject
/// scripted sources. Scripted sources stand in for the whole generator and
/// are free to ignore the bound.
pub trait RollSource {
    /// Draw one roll in `[0, upper_bound)`.
    fn draw(&mut self, upper_bound: Roll) -> Roll;
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Multiply-shift on the high bits: equivalent to `floor(u01 * max)`
    /// and free of modulo bias. Returns 0 when `max` is 0.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((u64::from(self.next_u32()) * u64::from(max)) >> 32) as u32
    }

}

impl RollSource for SimpleRng {
    fn draw(&mut self, upper_bound: Roll) -> Roll {
        self.next_range(u32::from(upper_bound)) as Roll
    }
}

/// Replays a fixed script of rolls, ignoring bounds.
///
/// Once the script runs out every further draw is a gutter ball.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    rolls: Vec<Roll>,
    index: usize,
}

impl SequenceSource {
    pub fn new(rolls: Vec<Roll>) -> Self {
        Self { rolls, index: 0 }
    }

    /// Scripted rolls not yet consumed.
    pub fn remaining(&self) -> usize {
        self.rolls.len().saturating_sub(self.index)
    }
}

impl RollSource for SequenceSource {
    fn draw(&mut self, _upper_bound: Roll) -> Roll {
        let pins = self.rolls.get(self.index).copied().unwrap_or(0);
        self.index += 1;
        pins
    }
}

/// Always returns the same roll, ignoring bounds.
#[derive(Debug, Clone, Copy)]
pub struct ConstantSource(pub Roll);

impl RollSource for ConstantSource {
    fn draw(&mut self, _upper_bound: Roll) -> Roll {
        self.0
    }
}

/// Clamp `upper_bound` to the pins still standing after `previous_rolls`.
///
/// An empty context, or one opened by a strike (full rack restored), passes
/// the bound through unchanged.
pub fn effective_bound(previous_rolls: &[Roll], upper_bound: Roll) -> Roll {
    match previous_rolls.last() {
        Some(&last) if !is_strike(previous_rolls) => {
            upper_bound.min(ROLL_UPPER_BOUND.saturating_sub(last))
        }
        _ => upper_bound,
    }
}

/// Produce one roll from `source`, honoring the pin-remaining constraint.
pub fn generate_roll(
    source: &mut dyn RollSource,
    previous_rolls: &[Roll],
    upper_bound: Roll,
) -> Roll {
    source.draw(effective_bound(previous_rolls, upper_bound))
}
