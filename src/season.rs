//! Season coordination
//!
//! Runs the rating pipeline over one season of completed games: roster,
//! fit, standings and the ranked table.

use crate::rankings::{build_power_rankings, PowerRankingRow};
use crate::rating::{RatingFit, RatingSolver, TeamRoster};
use crate::standings::tally;
use crate::types::{GameRecord, TeamUniverse};
use tracing::{info, warn};

/// Everything reported for a season
#[derive(Debug, Clone)]
pub struct SeasonReport {
    pub fit: RatingFit,
    pub rankings: Vec<PowerRankingRow>,
    pub games_rated: usize,
}

impl SeasonReport {
    pub fn home_advantage(&self) -> f64 {
        self.fit.home_advantage()
    }
}

/// Rate a season and build its rankings table
///
/// With [`TeamUniverse::Home`] a team that never hosted a game is not in the
/// roster, and the fit fails with `UnknownTeam` when it is referenced.
pub fn rate_season(
    games: &[GameRecord],
    universe: TeamUniverse,
    solver: &RatingSolver,
) -> crate::error::Result<SeasonReport> {
    let roster = TeamRoster::from_games(games, universe);
    let missing = roster.missing_teams(games);
    if !missing.is_empty() {
        warn!(
            "{} team(s) never played at home and are not rated under the '{}' team universe: {}",
            missing.len(),
            universe,
            missing.join(", ")
        );
    }

    let fit = solver.fit(&roster, games)?;
    let records = tally(games);
    let rankings = build_power_rankings(&fit.ratings, &records);

    info!(
        "Rated {} teams over {} games (converged: {})",
        roster.len(),
        games.len(),
        fit.converged()
    );

    Ok(SeasonReport {
        fit,
        rankings,
        games_rated: games.len(),
    })
}
