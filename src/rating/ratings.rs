//! Extracted team ratings
//!
//! The optimizer's solution vector is unpacked into a [`TeamRatings`] value,
//! which is the read-only output handed to rankings, export and the spread
//! prompt.

use crate::error::RatingError;
use crate::rating::model::forecast;
use crate::rating::roster::TeamRoster;
use crate::types::TeamName;
use std::collections::HashMap;

/// Per-team ratings plus the shared home advantage
#[derive(Debug, Clone, PartialEq)]
pub struct TeamRatings {
    roster: TeamRoster,
    ratings: Vec<f64>,
    home_advantage: f64,
}

impl TeamRatings {
    pub(crate) fn new(roster: TeamRoster, ratings: Vec<f64>, home_advantage: f64) -> Self {
        debug_assert_eq!(roster.len(), ratings.len());
        Self {
            roster,
            ratings,
            home_advantage,
        }
    }

    pub fn home_advantage(&self) -> f64 {
        self.home_advantage
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn contains(&self, team: &str) -> bool {
        self.roster.contains(team)
    }

    /// Rating of one team, or `UnknownTeam`
    pub fn rating(&self, team: &str) -> crate::error::Result<f64> {
        let idx = self.roster.index_of(team)?;
        Ok(self.ratings[idx])
    }

    /// Predicted home-minus-away margin for a game between two rated teams
    pub fn predict_margin(&self, home: &str, away: &str) -> crate::error::Result<f64> {
        Ok(forecast(
            self.rating(home)?,
            self.rating(away)?,
            self.home_advantage,
        ))
    }

    /// `(team, rating)` pairs in roster order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.roster
            .teams()
            .iter()
            .map(String::as_str)
            .zip(self.ratings.iter().copied())
    }

    pub fn to_map(&self) -> HashMap<TeamName, f64> {
        self.iter()
            .map(|(team, rating)| (team.to_string(), rating))
            .collect()
    }

    /// Re-pack into a parameter vector using the same roster order
    pub fn to_parameters(&self) -> Vec<f64> {
        let mut params = self.ratings.clone();
        params.push(self.home_advantage);
        params
    }
}

/// Split a solution vector into a team→rating mapping and the home advantage
///
/// `params` must hold one entry per name in `team_names` followed by the
/// home-advantage term.
pub fn extract<S: AsRef<str>>(
    params: &[f64],
    team_names: &[S],
) -> crate::error::Result<(HashMap<TeamName, f64>, f64)> {
    if params.len() != team_names.len() + 1 {
        return Err(RatingError::malformed(format!(
            "parameter vector has {} entries for {} teams",
            params.len(),
            team_names.len()
        ))
        .into());
    }

    let roster = TeamRoster::new(team_names.iter().map(|t| t.as_ref().to_string()))?;
    let ratings = roster.unpack(params)?;
    Ok((ratings.to_map(), ratings.home_advantage()))
}
