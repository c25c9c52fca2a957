use arrayvec::ArrayVec;

use crate::types::{Roll, FINAL_FRAME_MAX_ROLLS, FRAME_COUNT};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameSnapshot {
    pub rolls: ArrayVec<Roll, FINAL_FRAME_MAX_ROLLS>,
    pub score: u32,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerSnapshot {
    pub name: String,
    pub frames: [FrameSnapshot; FRAME_COUNT],
    pub total: u32,
}

#[derive(Debug, Clone, Default)]
pub struct RosterSnapshot {
    pub players: Vec<PlayerSnapshot>,
    pub current_player: usize,
    pub finished: bool,
    pub episode_id: u32,
    pub seed: u32,
}

impl RosterSnapshot {
    pub fn clear(&mut self) {
        self.players.clear();
        self.current_player = 0;
        self.finished = false;
        self.episode_id = 0;
        self.seed = 0;
    }

    pub fn playable(&self) -> bool {
        !self.players.is_empty() && !self.finished
    }
}
