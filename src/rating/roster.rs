//! Ordered team roster and the parameter-vector layout
//!
//! The optimizer works on a flat vector: one rating per team in roster order,
//! followed by the home-advantage term. [`TeamRoster`] owns that order, so the
//! vector is always packed and unpacked the same way.

use crate::error::RatingError;
use crate::rating::ratings::TeamRatings;
use crate::types::{GameRecord, TeamName, TeamUniverse};
use nalgebra::DVector;
use std::collections::{BTreeSet, HashMap};

/// Fixed-order association between team names and parameter indices
#[derive(Debug, Clone, PartialEq)]
pub struct TeamRoster {
    teams: Vec<TeamName>,
    index: HashMap<TeamName, usize>,
}

impl TeamRoster {
    /// Create a roster in the given order
    ///
    /// Fails with `MalformedInput` if a name appears twice.
    pub fn new<I, S>(teams: I) -> crate::error::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<TeamName>,
    {
        let teams: Vec<TeamName> = teams.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(teams.len());

        for (i, team) in teams.iter().enumerate() {
            if index.insert(team.clone(), i).is_some() {
                return Err(RatingError::malformed(format!("duplicate team name '{}'", team)).into());
            }
        }

        Ok(Self { teams, index })
    }

    /// Build the roster from a game store: sorted, de-duplicated team names
    pub fn from_games(games: &[GameRecord], universe: TeamUniverse) -> Self {
        let mut names: BTreeSet<&str> = games.iter().map(|g| g.home_team.as_str()).collect();
        if universe == TeamUniverse::All {
            names.extend(games.iter().map(|g| g.away_team.as_str()));
        }

        let teams: Vec<TeamName> = names.into_iter().map(str::to_string).collect();
        let index = teams
            .iter()
            .enumerate()
            .map(|(i, team)| (team.clone(), i))
            .collect();

        Self { teams, index }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Team names in parameter order
    pub fn teams(&self) -> &[TeamName] {
        &self.teams
    }

    pub fn contains(&self, team: &str) -> bool {
        self.index.contains_key(team)
    }

    /// Parameter index of a team, or `UnknownTeam`
    pub fn index_of(&self, team: &str) -> crate::error::Result<usize> {
        self.index
            .get(team)
            .copied()
            .ok_or_else(|| RatingError::unknown_team(team).into())
    }

    /// Length of the parameter vector: one slot per team plus home advantage
    pub fn parameter_len(&self) -> usize {
        self.teams.len() + 1
    }

    /// Index of the home-advantage slot (always last)
    pub fn home_advantage_index(&self) -> usize {
        self.teams.len()
    }

    /// All-zero starting point for the optimizer
    pub fn zero_parameters(&self) -> DVector<f64> {
        DVector::zeros(self.parameter_len())
    }

    /// Teams referenced by the games that are not in this roster, sorted
    pub fn missing_teams(&self, games: &[GameRecord]) -> Vec<TeamName> {
        let missing: BTreeSet<&str> = games
            .iter()
            .flat_map(|g| [g.home_team.as_str(), g.away_team.as_str()])
            .filter(|team| !self.contains(team))
            .collect();
        missing.into_iter().map(str::to_string).collect()
    }

    /// Pack ratings and home advantage into a parameter vector
    ///
    /// Every roster team must be present in `ratings` and nothing else may be.
    pub fn pack(
        &self,
        ratings: &HashMap<TeamName, f64>,
        home_advantage: f64,
    ) -> crate::error::Result<DVector<f64>> {
        if let Some(extra) = ratings.keys().find(|team| !self.contains(team)) {
            return Err(RatingError::unknown_team(extra.clone()).into());
        }

        let mut params = self.zero_parameters();
        for (i, team) in self.teams.iter().enumerate() {
            params[i] = *ratings
                .get(team)
                .ok_or_else(|| RatingError::malformed(format!("no rating for team '{}'", team)))?;
        }
        params[self.home_advantage_index()] = home_advantage;

        Ok(params)
    }

    /// Split a parameter vector back into per-team ratings and home advantage
    pub fn unpack(&self, params: &[f64]) -> crate::error::Result<TeamRatings> {
        if params.len() != self.parameter_len() {
            return Err(RatingError::malformed(format!(
                "parameter vector has {} entries, expected {} ({} teams + home advantage)",
                params.len(),
                self.parameter_len(),
                self.len()
            ))
            .into());
        }

        let (ratings, home) = params.split_at(self.len());
        Ok(TeamRatings::new(self.clone(), ratings.to_vec(), home[0]))
    }
}
