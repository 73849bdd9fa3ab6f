use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::Team;

/// Point-in-time read of a game's score and clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub home_score: u32,
    pub away_score: u32,
    /// Time elapsed since the game clock was started
    pub elapsed_clock: Duration,
}

impl Snapshot {
    /// Score of one side
    pub fn score_for(&self, team: Team) -> u32 {
        match team {
            Team::Home => self.home_score,
            Team::Away => self.away_score,
        }
    }
}
