//! Rating solver
//!
//! Fits team ratings and home advantage to a season of results by minimizing
//! the squared margin error from an all-zero start.

use crate::config::SolverSettings;
use crate::rating::model::MarginObjective;
use crate::rating::optimizer::{Bfgs, Minimizer, Termination};
use crate::rating::ratings::TeamRatings;
use crate::rating::roster::TeamRoster;
use crate::types::GameRecord;
use tracing::{debug, info, warn};

/// Result of a rating fit
#[derive(Debug, Clone)]
pub struct RatingFit {
    pub ratings: TeamRatings,
    /// Sum of squared margin errors at the solution
    pub objective_value: f64,
    pub gradient_norm: f64,
    pub iterations: usize,
    pub function_evaluations: usize,
    pub termination: Termination,
}

impl RatingFit {
    /// Whether the optimizer met its tolerance
    ///
    /// A non-converged fit still carries the best ratings found.
    pub fn converged(&self) -> bool {
        self.termination == Termination::GradientTolerance
    }

    pub fn home_advantage(&self) -> f64 {
        self.ratings.home_advantage()
    }
}

/// Solves for ratings with a pluggable minimizer
pub struct RatingSolver {
    minimizer: Box<dyn Minimizer>,
}

impl Default for RatingSolver {
    fn default() -> Self {
        Self::new(Box::new(Bfgs::default()))
    }
}

impl RatingSolver {
    pub fn new(minimizer: Box<dyn Minimizer>) -> Self {
        Self { minimizer }
    }

    /// Create a BFGS-backed solver from configuration
    pub fn from_settings(settings: &SolverSettings) -> crate::error::Result<Self> {
        let bfgs = Bfgs {
            gradient_tolerance: settings.gradient_tolerance,
            max_iterations: settings.max_iterations,
            max_line_search_steps: settings.max_line_search_steps,
        };
        bfgs.validate()?;
        Ok(Self::new(Box::new(bfgs)))
    }

    /// Fit ratings for every team in `roster` from `games`
    ///
    /// Fails with `UnknownTeam` if a game names a team outside the roster.
    pub fn fit(&self, roster: &TeamRoster, games: &[GameRecord]) -> crate::error::Result<RatingFit> {
        let objective = MarginObjective::new(roster, games)?;
        self.solve(roster, &objective)
    }

    fn solve(
        &self,
        roster: &TeamRoster,
        objective: &MarginObjective,
    ) -> crate::error::Result<RatingFit> {
        info!(
            "Fitting ratings for {} teams from {} games",
            roster.len(),
            objective.game_count()
        );
        debug!("Minimizer configuration: {}", self.minimizer.config());

        let outcome = self.minimizer.minimize(objective, roster.zero_parameters())?;

        if !outcome.converged() {
            warn!(
                "Rating fit did not converge ({}) after {} iterations; using best iterate (|g| = {:.3e})",
                outcome.termination, outcome.iterations, outcome.gradient_norm
            );
        }

        let ratings = roster.unpack(outcome.params.as_slice())?;
        info!(
            "Home edge {:.3}, objective {:.3} after {} iterations",
            ratings.home_advantage(),
            outcome.value,
            outcome.iterations
        );

        Ok(RatingFit {
            ratings,
            objective_value: outcome.value,
            gradient_norm: outcome.gradient_norm,
            iterations: outcome.iterations,
            function_evaluations: outcome.function_evaluations,
            termination: outcome.termination,
        })
    }
}

/// Fit ratings from aligned sequences using the default minimizer
///
/// `team_names` fixes the parameter order; the game sequences are aligned by
/// position, one game per index.
pub fn find_optimal_ratings<S: AsRef<str>>(
    team_names: &[S],
    home_teams: &[S],
    away_teams: &[S],
    score_margins: &[i64],
) -> crate::error::Result<RatingFit> {
    let roster = TeamRoster::new(team_names.iter().map(|t| t.as_ref().to_string()))?;
    let objective = MarginObjective::from_sequences(&roster, home_teams, away_teams, score_margins)?;
    RatingSolver::default().solve(&roster, &objective)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RatingError;
    use crate::rating::optimizer::MinimizeOutcome;
    use crate::rating::Objective;
    use nalgebra::DVector;

    /// Minimizer that hands back the start vector untouched
    struct StuckMinimizer;

    impl Minimizer for StuckMinimizer {
        fn minimize(
            &self,
            objective: &dyn Objective,
            start: DVector<f64>,
        ) -> crate::error::Result<MinimizeOutcome> {
            let value = objective.value(&start);
            let gradient_norm = objective.gradient(&start).amax();
            Ok(MinimizeOutcome {
                params: start,
                value,
                gradient_norm,
                iterations: 0,
                function_evaluations: 1,
                termination: Termination::MaxIterations,
            })
        }

        fn config(&self) -> serde_json::Value {
            serde_json::json!({ "type": "stuck" })
        }
    }

    fn games() -> Vec<GameRecord> {
        vec![
            GameRecord::new("A", "B", 3, 1),
            GameRecord::new("B", "C", 2, 2),
            GameRecord::new("C", "A", 1, 4),
        ]
    }

    #[test]
    fn test_fit_three_team_example() {
        let roster = TeamRoster::new(["A", "B", "C"]).unwrap();
        let fit = RatingSolver::default().fit(&roster, &games()).unwrap();

        assert!(fit.converged());
        assert!(fit.objective_value < 1e-6);
        // The margins are consistent with h = -1/3
        assert!((fit.home_advantage() + 1.0 / 3.0).abs() < 1e-3);

        let r = &fit.ratings;
        assert!(r.rating("A").unwrap() > r.rating("B").unwrap());
        assert!(r.rating("B").unwrap() > r.rating("C").unwrap());
        assert!((r.predict_margin("A", "B").unwrap() - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_fit_empty_store_returns_zero_start() {
        let roster = TeamRoster::new(["A", "B"]).unwrap();
        let fit = RatingSolver::default().fit(&roster, &[]).unwrap();

        assert!(fit.converged());
        assert_eq!(fit.iterations, 0);
        assert_eq!(fit.objective_value, 0.0);
        assert_eq!(fit.ratings.to_parameters(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_non_convergence_is_reported_not_fatal() {
        let roster = TeamRoster::new(["A", "B", "C"]).unwrap();
        let solver = RatingSolver::new(Box::new(StuckMinimizer));
        let fit = solver.fit(&roster, &games()).unwrap();

        assert!(!fit.converged());
        assert_eq!(fit.termination, Termination::MaxIterations);
        assert_eq!(fit.objective_value, 13.0);
        assert_eq!(fit.ratings.len(), 3);
    }

    #[test]
    fn test_fit_unknown_team_fails_before_solving() {
        let roster = TeamRoster::new(["A", "B"]).unwrap();
        let err = RatingSolver::default().fit(&roster, &games()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::UnknownTeam { team }) if team == "C"
        ));
    }

    #[test]
    fn test_find_optimal_ratings_sequences() {
        let fit = find_optimal_ratings(
            &["A", "B", "C"],
            &["A", "B", "C"],
            &["B", "C", "A"],
            &[2, 0, -3],
        )
        .unwrap();
        assert!(fit.objective_value < 1e-6);
    }

    #[test]
    fn test_from_settings_validates() {
        let mut settings = SolverSettings::default();
        assert!(RatingSolver::from_settings(&settings).is_ok());

        settings.gradient_tolerance = -1.0;
        assert!(RatingSolver::from_settings(&settings).is_err());
    }
}
