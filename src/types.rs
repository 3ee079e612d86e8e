//! Common types used throughout the rating pipeline

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unique identifier for teams
pub type TeamName = String;

/// One row of the season's results table, as published
///
/// Scores are `None` for games that have not been played yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub date: Option<NaiveDate>,
    pub away_team: TeamName,
    pub away_score: Option<u32>,
    pub home_team: TeamName,
    pub home_score: Option<u32>,
}

/// A completed game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub date: Option<NaiveDate>,
    pub home_team: TeamName,
    pub away_team: TeamName,
    pub home_score: u32,
    pub away_score: u32,
}

impl GameRecord {
    pub fn new(
        home_team: impl Into<TeamName>,
        away_team: impl Into<TeamName>,
        home_score: u32,
        away_score: u32,
    ) -> Self {
        Self {
            date: None,
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_score,
            away_score,
        }
    }

    /// Home score minus away score
    pub fn score_margin(&self) -> i64 {
        i64::from(self.home_score) - i64::from(self.away_score)
    }
}

/// Which teams make up the rated set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamUniverse {
    /// Distinct home-team names only
    #[default]
    Home,
    /// Distinct home and away team names
    All,
}

impl std::fmt::Display for TeamUniverse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamUniverse::Home => write!(f, "home"),
            TeamUniverse::All => write!(f, "all"),
        }
    }
}

impl std::str::FromStr for TeamUniverse {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "home" => Ok(TeamUniverse::Home),
            "all" => Ok(TeamUniverse::All),
            other => Err(format!("unknown team universe '{}' (expected home or all)", other)),
        }
    }
}
