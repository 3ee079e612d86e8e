//! Season results feed
//!
//! Fetches (or loads a saved copy of) the results page and reduces its
//! results table to completed game records.

pub mod fetch;
pub mod parse;

// Re-export commonly used types
pub use fetch::ResultsFeed;
pub use parse::{parse_schedule, to_game_records};
