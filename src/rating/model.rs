//! Margin model: forecast, per-game residual and the aggregate objective
//!
//! A game's forecast margin is `home_rating - away_rating + home_advantage`.
//! The objective is the sum of squared differences between actual and
//! forecast margins over every game in the store.

use crate::error::RatingError;
use crate::rating::optimizer::Objective;
use crate::rating::roster::TeamRoster;
use crate::types::GameRecord;
use nalgebra::DVector;

/// Predicted home-minus-away margin
pub fn forecast(home_rating: f64, away_rating: f64, home_advantage: f64) -> f64 {
    home_rating - away_rating + home_advantage
}

/// Squared prediction error for a single game
pub fn residual(home_rating: f64, away_rating: f64, home_advantage: f64, actual_margin: f64) -> f64 {
    let error = actual_margin - forecast(home_rating, away_rating, home_advantage);
    error * error
}

/// Sum of squared errors over all games for one parameter vector
///
/// `params` holds one rating per entry of `team_names` followed by the home
/// advantage. The three game sequences are aligned by position. Sequence
/// length mismatches are `MalformedInput`; a team missing from `team_names`
/// is `UnknownTeam`.
pub fn objective<S: AsRef<str>>(
    params: &[f64],
    team_names: &[S],
    home_teams: &[S],
    away_teams: &[S],
    score_margins: &[i64],
) -> crate::error::Result<f64> {
    let roster = TeamRoster::new(team_names.iter().map(|t| t.as_ref().to_string()))?;
    if params.len() != roster.parameter_len() {
        return Err(RatingError::malformed(format!(
            "parameter vector has {} entries, expected {}",
            params.len(),
            roster.parameter_len()
        ))
        .into());
    }

    let model = MarginObjective::from_sequences(&roster, home_teams, away_teams, score_margins)?;
    Ok(model.value(&DVector::from_column_slice(params)))
}

/// One game with its team names resolved to parameter indices
#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexedGame {
    home: usize,
    away: usize,
    margin: f64,
}

/// The least-squares objective over a fixed roster and game store
///
/// Team lookups are resolved once at construction so that an unknown team
/// fails before the optimizer starts.
#[derive(Debug, Clone)]
pub struct MarginObjective {
    games: Vec<IndexedGame>,
    dimension: usize,
}

impl MarginObjective {
    pub fn new(roster: &TeamRoster, games: &[GameRecord]) -> crate::error::Result<Self> {
        let games = games
            .iter()
            .map(|g| {
                Ok(IndexedGame {
                    home: roster.index_of(&g.home_team)?,
                    away: roster.index_of(&g.away_team)?,
                    margin: g.score_margin() as f64,
                })
            })
            .collect::<crate::error::Result<Vec<_>>>()?;

        Ok(Self {
            games,
            dimension: roster.parameter_len(),
        })
    }

    /// Build from aligned home/away/margin sequences
    pub fn from_sequences<S: AsRef<str>>(
        roster: &TeamRoster,
        home_teams: &[S],
        away_teams: &[S],
        score_margins: &[i64],
    ) -> crate::error::Result<Self> {
        if home_teams.len() != away_teams.len() || home_teams.len() != score_margins.len() {
            return Err(RatingError::malformed(format!(
                "misaligned game sequences: {} home teams, {} away teams, {} margins",
                home_teams.len(),
                away_teams.len(),
                score_margins.len()
            ))
            .into());
        }

        let games = home_teams
            .iter()
            .zip(away_teams)
            .zip(score_margins)
            .map(|((home, away), &margin)| {
                Ok(IndexedGame {
                    home: roster.index_of(home.as_ref())?,
                    away: roster.index_of(away.as_ref())?,
                    margin: margin as f64,
                })
            })
            .collect::<crate::error::Result<Vec<_>>>()?;

        Ok(Self {
            games,
            dimension: roster.parameter_len(),
        })
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    fn error(&self, game: &IndexedGame, params: &DVector<f64>) -> f64 {
        let home_advantage = params[self.dimension - 1];
        game.margin - forecast(params[game.home], params[game.away], home_advantage)
    }
}

impl Objective for MarginObjective {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn value(&self, params: &DVector<f64>) -> f64 {
        let home_advantage = params[self.dimension - 1];
        self.games
            .iter()
            .map(|g| residual(params[g.home], params[g.away], home_advantage, g.margin))
            .sum()
    }

    fn gradient(&self, params: &DVector<f64>) -> DVector<f64> {
        let mut gradient = DVector::zeros(self.dimension);
        let home_slot = self.dimension - 1;

        // d/dx (m - (r_h - r_a + h))^2 = -2e * d(forecast)/dx
        for game in &self.games {
            let e = self.error(game, params);
            gradient[game.home] -= 2.0 * e;
            gradient[game.away] += 2.0 * e;
            gradient[home_slot] -= 2.0 * e;
        }

        gradient
    }
}
