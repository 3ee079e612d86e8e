//! Results table parsing
//!
//! Reads the season results table out of an HTML page. Columns are located
//! by header text: `Date`, `Visitor` (or `Away`) and `Home`; each team
//! column is followed by its score column.

use crate::error::RatingError;
use crate::types::{GameRecord, ScheduleRow};
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

/// Column positions within a results row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnLayout {
    date: usize,
    away: usize,
    home: usize,
}

impl ColumnLayout {
    fn from_headers(headers: &[String]) -> crate::error::Result<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
        };

        let date = find(&["Date"]);
        let away = find(&["Visitor", "Away"]);
        let home = find(&["Home"]);

        match (date, away, home) {
            (Some(date), Some(away), Some(home)) => Ok(Self { date, away, home }),
            _ => Err(feed_error(format!(
                "results table is missing Date/Visitor/Home columns (headers: {})",
                headers.join(", ")
            ))),
        }
    }

    fn away_score(&self) -> usize {
        self.away + 1
    }

    fn home_score(&self) -> usize {
        self.home + 1
    }

    fn min_cells(&self) -> usize {
        self.date.max(self.away_score()).max(self.home_score()) + 1
    }
}

fn feed_error(message: impl Into<String>) -> anyhow::Error {
    RatingError::FeedError {
        message: message.into(),
    }
    .into()
}

fn selector(css: &str) -> crate::error::Result<Selector> {
    Selector::parse(css).map_err(|e| feed_error(format!("invalid selector '{}': {:?}", css, e)))
}

fn cell_texts(row: ElementRef<'_>, cells: &Selector) -> Vec<String> {
    row.select(cells)
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%a, %b %d, %Y"))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%b %d, %Y"))
        .ok()
}

fn parse_score(raw: &str, row: usize) -> crate::error::Result<Option<u32>> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| feed_error(format!("unparseable score '{}' in row {}", raw, row)))
}

/// Parse the first table matching `table_selector` into schedule rows
///
/// Repeated header rows inside the body and rows too short to hold a game
/// are skipped. Empty score cells become `None`.
pub fn parse_schedule(html: &str, table_selector: &str) -> crate::error::Result<Vec<ScheduleRow>> {
    let document = Html::parse_document(html);
    let table_sel = selector(table_selector)?;
    let header_sel = selector("thead tr")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("th, td")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| feed_error(format!("no table matches '{}'", table_selector)))?;

    let header_row = table
        .select(&header_sel)
        .last()
        .or_else(|| table.select(&row_sel).next())
        .ok_or_else(|| feed_error("results table has no rows"))?;
    let headers = cell_texts(header_row, &cell_sel);
    let layout = ColumnLayout::from_headers(&headers)?;
    debug!("Results table layout: {:?}", layout);

    let mut rows = Vec::new();
    for (n, tr) in table.select(&row_sel).enumerate() {
        if tr.id() == header_row.id() {
            continue;
        }

        let cells = cell_texts(tr, &cell_sel);
        if cells.len() < layout.min_cells() {
            continue;
        }
        if cells[layout.date].eq_ignore_ascii_case(&headers[layout.date]) {
            continue;
        }

        rows.push(ScheduleRow {
            date: parse_date(&cells[layout.date]),
            away_team: cells[layout.away].clone(),
            away_score: parse_score(&cells[layout.away_score()], n)?,
            home_team: cells[layout.home].clone(),
            home_score: parse_score(&cells[layout.home_score()], n)?,
        });
    }

    Ok(rows)
}

/// Reduce schedule rows to completed games
///
/// Rows without both scores (unplayed) and 0–0 placeholder rows are dropped.
pub fn to_game_records(rows: &[ScheduleRow]) -> Vec<GameRecord> {
    let games: Vec<GameRecord> = rows
        .iter()
        .filter_map(|row| match (row.home_score, row.away_score) {
            (Some(0), Some(0)) | (None, _) | (_, None) => None,
            (Some(home_score), Some(away_score)) => Some(GameRecord {
                date: row.date,
                home_team: row.home_team.clone(),
                away_team: row.away_team.clone(),
                home_score,
                away_score,
            }),
        })
        .collect();

    info!(
        "Kept {} completed games, dropped {} unplayed or placeholder rows",
        games.len(),
        rows.len() - games.len()
    );
    games
}
