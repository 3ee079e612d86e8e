//! Power Rankings - least-squares team ratings for a league season
//!
//! This crate fits one rating per team plus a shared home advantage to a
//! season of game results, ranks the teams, and forecasts margins between
//! any two of them.

pub mod config;
pub mod error;
pub mod export;
pub mod feed;
pub mod rankings;
pub mod rating;
pub mod season;
pub mod spreads;
pub mod standings;
pub mod types;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use rating::{RatingFit, RatingSolver, TeamRatings, TeamRoster};
pub use season::{rate_season, SeasonReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
