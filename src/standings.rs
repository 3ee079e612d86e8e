//! Win/loss and goal tallies per team
//!
//! Tallied in one pass over the game store.

use crate::types::{GameRecord, TeamName};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A team's record over the game store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub wins: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl TeamRecord {
    pub fn games_played(&self) -> u32 {
        self.wins + self.losses
    }

    fn add_game(&mut self, scored: u32, conceded: u32) {
        self.goals_for += scored;
        self.goals_against += conceded;
        // Anything short of outscoring the opponent is booked as a loss
        if scored > conceded {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }
}

/// Tally records for every team appearing in `games`
pub fn tally(games: &[GameRecord]) -> HashMap<TeamName, TeamRecord> {
    let mut records: HashMap<TeamName, TeamRecord> = HashMap::new();

    for game in games {
        records
            .entry(game.home_team.clone())
            .or_default()
            .add_game(game.home_score, game.away_score);
        records
            .entry(game.away_team.clone())
            .or_default()
            .add_game(game.away_score, game.home_score);
    }

    records
}
