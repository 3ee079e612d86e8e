//! Results page retrieval

use crate::config::FeedSettings;
use crate::error::RatingError;
use crate::feed::parse::{parse_schedule, to_game_records};
use crate::types::GameRecord;
use anyhow::Context;
use reqwest::blocking::Client;
use std::path::Path;
use tracing::info;

/// Blocking loader for the season results page
pub struct ResultsFeed {
    client: Client,
    settings: FeedSettings,
}

impl ResultsFeed {
    pub fn new(settings: FeedSettings) -> crate::error::Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.timeout())
            .build()
            .context("failed to build http client")?;

        Ok(Self { client, settings })
    }

    /// GET a page; any non-success status is a `FeedError`
    pub fn fetch_page(&self, url: &str) -> crate::error::Result<String> {
        info!("Fetching results from {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("request to {} failed", url))?;

        if !response.status().is_success() {
            return Err(RatingError::FeedError {
                message: format!("HTTP {}: {}", response.status(), url),
            }
            .into());
        }

        response
            .text()
            .with_context(|| format!("failed to read body from {}", url))
    }

    /// Read a saved copy of the results page
    pub fn load_page(path: &Path) -> crate::error::Result<String> {
        info!("Loading results from {}", path.display());
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read results file {}", path.display()))
    }

    /// The results page from the configured file, or the configured URL
    pub fn page(&self) -> crate::error::Result<String> {
        match &self.settings.input_path {
            Some(path) => Self::load_page(path),
            None => self.fetch_page(&self.settings.url),
        }
    }

    /// Completed games from the configured source
    pub fn load_games(&self) -> crate::error::Result<Vec<GameRecord>> {
        let html = self.page()?;
        let rows = parse_schedule(&html, &self.settings.table_selector)?;
        Ok(to_game_records(&rows))
    }
}
