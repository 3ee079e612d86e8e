//! Least-squares team ratings
//!
//! This module provides the margin model, the parameter layout, the
//! minimizer interface with a BFGS implementation, and the solver that ties
//! them together.

pub mod model;
pub mod optimizer;
pub mod ratings;
pub mod roster;
pub mod solver;

// Re-export commonly used types
pub use model::{forecast, objective, residual, MarginObjective};
pub use optimizer::{Bfgs, MinimizeOutcome, Minimizer, Objective, Termination};
pub use ratings::{extract, TeamRatings};
pub use roster::TeamRoster;
pub use solver::{find_optimal_ratings, RatingFit, RatingSolver};
