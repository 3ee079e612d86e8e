//! Interactive spread queries
//!
//! A validated read loop: asks whether to calculate a spread, reads a home
//! and an away team, and prints the forecast margin. Works over any
//! `BufRead`/`Write` pair so it can be driven from tests.

use crate::rating::TeamRatings;
use anyhow::Context;
use std::io::{BufRead, Write};

const INVALID_RESPONSE: &str = "Not a valid response. Try Again.";
const INVALID_TEAM: &str = "Invalid team. Please try again.";

/// Prompt loop over a set of fitted ratings
pub struct SpreadPrompt<'a, R, W> {
    ratings: &'a TeamRatings,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> SpreadPrompt<'a, R, W> {
    pub fn new(ratings: &'a TeamRatings, input: R, output: W) -> Self {
        Self {
            ratings,
            input,
            output,
        }
    }

    /// Run until the user answers `n` or input ends; returns spreads reported
    pub fn run(&mut self) -> crate::error::Result<usize> {
        let mut reported = 0;

        while self.ask_continue()? {
            let Some(home) = self.ask_team("Home Team: ")? else {
                break;
            };
            let Some(away) = self.ask_team("Away Team: ")? else {
                break;
            };

            let margin = self.ratings.predict_margin(&home, &away)?;
            writeln!(self.output, "{} vs {}: {:.2}", home, away, margin)?;
            reported += 1;
        }

        Ok(reported)
    }

    fn prompt(&mut self, text: &str) -> crate::error::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read from input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_continue(&mut self) -> crate::error::Result<bool> {
        loop {
            match self.prompt("Calculate Spreads? (y/n) ")?.as_deref() {
                Some("y") => return Ok(true),
                Some("n") | None => return Ok(false),
                Some(_) => writeln!(self.output, "{}", INVALID_RESPONSE)?,
            }
        }
    }

    fn ask_team(&mut self, text: &str) -> crate::error::Result<Option<String>> {
        loop {
            match self.prompt(text)? {
                Some(team) if self.ratings.contains(&team) => return Ok(Some(team)),
                Some(_) => writeln!(self.output, "{}", INVALID_TEAM)?,
                None => return Ok(None),
            }
        }
    }
}
