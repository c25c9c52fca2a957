//! Frame module - the score sheet data model
//!
//! A sheet is ten frames; regular frames hold up to two rolls, the final
//! frame up to three. Roll storage is fixed-capacity so a sheet never
//! touches the allocator after the player joins.

use arrayvec::ArrayVec;

use crate::scoring;
use crate::types::{
    Roll, FINAL_FRAME_INDEX, FINAL_FRAME_MAX_ROLLS, FRAME_COUNT, REGULAR_FRAME_MAX_ROLLS,
};

/// One frame on the score sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    rolls: ArrayVec<Roll, FINAL_FRAME_MAX_ROLLS>,
    score: u32,
}

impl Frame {
    /// Rolls recorded so far, oldest first.
    pub fn rolls(&self) -> &[Roll] {
        &self.rolls
    }

    /// Score as of the last rescore pass.
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn roll_count(&self) -> usize {
        self.rolls.len()
    }

    /// Record one roll. The state machine never pushes into a full frame;
    /// that invariant is what keeps this infallible.
    pub(crate) fn push_roll(&mut self, pins: Roll) {
        self.rolls.push(pins);
    }

    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    /// Reset to an unrolled frame.
    pub(crate) fn clear(&mut self) {
        self.rolls.clear();
        self.score = 0;
    }
}

/// A roster entry: a name and the ten frames of their sheet.
#[derive(Debug, Clone)]
pub struct Player {
    name: String,
    frames: [Frame; FRAME_COUNT],
}

impl Player {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            frames: std::array::from_fn(|_| Frame::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub(crate) fn frames_mut(&mut self) -> &mut [Frame] {
        &mut self.frames
    }

    /// Sum of the ten frame scores.
    pub fn total_score(&self) -> u32 {
        scoring::total_score(&self.frames)
    }

    /// First frame that still has room for a roll, scanning from the top
    /// of the sheet. `None` once every frame is at capacity.
    ///
    /// Note that the final frame counts as active at two rolls even when no
    /// third roll will be earned; whether one actually happens is the state
    /// machine's call.
    pub fn active_frame_index(&self) -> Option<usize> {
        (0..FRAME_COUNT).find(|&idx| {
            let max = if idx == FINAL_FRAME_INDEX {
                FINAL_FRAME_MAX_ROLLS
            } else {
                REGULAR_FRAME_MAX_ROLLS
            };
            self.frames[idx].roll_count() < max
        })
    }

    /// Whether another roll can still land on this sheet. A final frame
    /// standing at two rolls only continues on a strike or spare.
    pub fn can_roll(&self) -> bool {
        match self.active_frame_index() {
            Some(FINAL_FRAME_INDEX) => {
                let rolls = self.frames[FINAL_FRAME_INDEX].rolls();
                rolls.len() < REGULAR_FRAME_MAX_ROLLS
                    || scoring::has_strike(rolls)
                    || scoring::is_spare(rolls)
            }
            Some(_) => true,
            None => false,
        }
    }

    pub(crate) fn reset_frames(&mut self) {
        for frame in &mut self.frames {
            frame.clear();
        }
    }
}
