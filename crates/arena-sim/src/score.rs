//! Running score for a session.

use arena_core::state::ScoreView;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreState {
    pub score: u32,
    pub kills: u32,
    pub shots_fired: u32,
}

impl ScoreState {
    pub fn view(&self) -> ScoreView {
        ScoreView {
            score: self.score,
            kills: self.kills,
            shots_fired: self.shots_fired,
        }
    }
}
