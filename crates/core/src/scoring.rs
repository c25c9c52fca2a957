//! Scoring module - frame-by-frame sheet scoring
//!
//! House scoring, not regulation ten-pin: every frame is rescored in a
//! single pass with at most one frame of lookahead. A strike counts the
//! next frame's rolls as they stand right now, a spare counts the next
//! frame's first roll, and nothing chains further than that. The running
//! total is simply the sum of the ten frame scores.

use crate::frame::Frame;
use crate::types::{Roll, PIN_COUNT};

/// First roll of the frame took all ten pins.
pub fn is_strike(rolls: &[Roll]) -> bool {
    rolls.first() == Some(&PIN_COUNT)
}

/// Two rolls, neither a strike, clearing the rack between them.
pub fn is_spare(rolls: &[Roll]) -> bool {
    rolls.len() >= 2 && !rolls[..2].contains(&PIN_COUNT) && rolls[0] + rolls[1] == PIN_COUNT
}

/// Any roll in the frame took all ten pins. This is the final frame's
/// third-roll eligibility test, where a strike can sit in either slot.
pub fn has_strike(rolls: &[Roll]) -> bool {
    rolls.contains(&PIN_COUNT)
}

/// Score of frame `idx` as the sheet stands right now.
fn frame_score(frames: &[Frame], idx: usize) -> u32 {
    let rolls = frames[idx].rolls();
    let mut score: u32 = rolls.iter().map(|&r| u32::from(r)).sum();

    if rolls.len() == 2 && score >= u32::from(PIN_COUNT) {
        // Spare (or ten pins over two rolls): one frame of lookahead on the
        // next frame's first roll, which reads as 0 until it lands. The
        // final frame has no next; its own third roll joins the base sum
        // when it arrives, so nothing extra is owed here.
        if let Some(next) = frames.get(idx + 1) {
            score += next.rolls().first().copied().map_or(0, u32::from);
        }
    } else if rolls.len() == 1 && score == u32::from(PIN_COUNT) {
        // Strike: count the next frame's rolls as they stand right now,
        // whether that is zero, one or two of them. A final-frame strike
        // stays at 10 until its fill rolls land in the base sum.
        if let Some(next) = frames.get(idx + 1) {
            score += next.rolls().iter().map(|&r| u32::from(r)).sum::<u32>();
        }
    }

    score
}

/// Recompute every frame score in one pass over the sheet.
pub fn rescore_frames(frames: &mut [Frame]) {
    for idx in 0..frames.len() {
        let score = frame_score(frames, idx);
        frames[idx].set_score(score);
    }
}

/// Sum of the frame scores as last rescored.
pub fn total_score(frames: &[Frame]) -> u32 {
    frames.iter().map(Frame::score).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FRAME_COUNT;

    /// Build a full sheet from per-frame roll lists.
    fn sheet(rolls_per_frame: &[&[Roll]]) -> Vec<Frame> {
        let mut frames = vec![Frame::default(); FRAME_COUNT];
        for (frame, rolls) in frames.iter_mut().zip(rolls_per_frame) {
            for &pins in *rolls {
                frame.push_roll(pins);
            }
        }
        frames
    }

    #[test]
    fn test_is_strike() {
        assert!(is_strike(&[10]));
        assert!(is_strike(&[10, 0]));
        assert!(!is_strike(&[5, 5]));
        assert!(!is_strike(&[]));
    }

    #[test]
    fn test_is_spare() {
        assert!(is_spare(&[5, 5]));
        // Ten in either of the first two slots disqualifies the pair.
        assert!(!is_spare(&[0, 10]));
        assert!(!is_spare(&[10, 0]));
        assert!(!is_spare(&[4, 5]));
        assert!(!is_spare(&[4]));
    }

    #[test]
    fn test_has_strike_any_slot() {
        assert!(has_strike(&[10, 3]));
        assert!(has_strike(&[4, 3, 10]));
        assert!(!has_strike(&[4, 6, 7]));
        assert!(!has_strike(&[]));
    }

    #[test]
    fn test_open_frames_score_their_pins() {
        let mut frames = sheet(&[&[3, 4], &[0, 0], &[9, 0]]);
        rescore_frames(&mut frames);
        assert_eq!(frames[0].score(), 7);
        assert_eq!(frames[1].score(), 0);
        assert_eq!(frames[2].score(), 9);
    }

    #[test]
    fn test_strike_spare_open_reference_row() {
        // Strike frame, spare frame, open frame: 15 / 13 / 7.
        let mut frames = sheet(&[&[10, 0], &[5, 5], &[3, 4]]);
        rescore_frames(&mut frames);
        assert_eq!(frames[0].score(), 15);
        assert_eq!(frames[1].score(), 13);
        assert_eq!(frames[2].score(), 7);
    }

    #[test]
    fn test_spare_waits_for_next_first_roll() {
        let mut frames = sheet(&[&[6, 4]]);
        rescore_frames(&mut frames);
        // Next frame untouched: bonus reads as 0 for now.
        assert_eq!(frames[0].score(), 10);

        frames[1].push_roll(8);
        rescore_frames(&mut frames);
        assert_eq!(frames[0].score(), 18);

        // The second roll of the next frame is not a spare's business.
        frames[1].push_roll(1);
        rescore_frames(&mut frames);
        assert_eq!(frames[0].score(), 18);
    }

    #[test]
    fn test_lone_strike_counts_next_frame_as_it_stands() {
        let mut frames = sheet(&[&[10]]);
        rescore_frames(&mut frames);
        assert_eq!(frames[0].score(), 10);

        frames[1].push_roll(5);
        rescore_frames(&mut frames);
        assert_eq!(frames[0].score(), 15);

        frames[1].push_roll(2);
        rescore_frames(&mut frames);
        assert_eq!(frames[0].score(), 17);
    }

    #[test]
    fn test_no_chaining_past_one_frame() {
        // Back-to-back strike frames: each one only sees its neighbor.
        let mut frames = sheet(&[&[10, 0], &[10, 0], &[3, 2]]);
        rescore_frames(&mut frames);
        assert_eq!(frames[0].score(), 20);
        assert_eq!(frames[1].score(), 13);
        assert_eq!(frames[2].score(), 5);
    }

    #[test]
    fn test_final_frame_spare_adds_its_own_third_roll() {
        let mut rolls: Vec<&[Roll]> = vec![&[1, 1]; 9];
        rolls.push(&[8, 2]);
        let mut frames = sheet(&rolls);
        rescore_frames(&mut frames);
        // Third roll pending: reads as 0.
        assert_eq!(frames[9].score(), 10);

        frames[9].push_roll(7);
        rescore_frames(&mut frames);
        assert_eq!(frames[9].score(), 17);
    }

    #[test]
    fn test_final_frame_strike_transient_then_filled() {
        let mut rolls: Vec<&[Roll]> = vec![&[1, 1]; 9];
        rolls.push(&[10]);
        let mut frames = sheet(&rolls);
        rescore_frames(&mut frames);
        assert_eq!(frames[9].score(), 10);

        frames[9].push_roll(1);
        frames[9].push_roll(7);
        rescore_frames(&mut frames);
        assert_eq!(frames[9].score(), 18);
    }

    #[test]
    fn test_total_score_sums_the_sheet() {
        let mut frames = sheet(&[&[10, 0], &[5, 5], &[3, 4]]);
        rescore_frames(&mut frames);
        assert_eq!(total_score(&frames), 15 + 13 + 7);

        let empty = vec![Frame::default(); FRAME_COUNT];
        assert_eq!(total_score(&empty), 0);
    }
}
