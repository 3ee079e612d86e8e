//! Power rankings table
//!
//! Merges fitted ratings with team records, sorts by rating and assigns
//! ranks. Tied ratings share the average of the positions they span.

use crate::rating::TeamRatings;
use crate::standings::TeamRecord;
use crate::types::TeamName;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Write as _;

/// One row of the power rankings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerRankingRow {
    #[serde(rename = "Team")]
    pub team: TeamName,
    #[serde(rename = "W")]
    pub wins: u32,
    #[serde(rename = "L")]
    pub losses: u32,
    #[serde(rename = "Rating")]
    pub rating: f64,
    #[serde(rename = "Rank")]
    pub rank: f64,
    #[serde(rename = "GS")]
    pub goals_for: u32,
    #[serde(rename = "GA")]
    pub goals_against: u32,
}

/// Round to two decimals for presentation
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Assign 1-based ranks to values already sorted in descending order
///
/// Equal values share the mean of the positions they occupy.
pub fn average_ranks(sorted_desc: &[f64]) -> Vec<f64> {
    let mut ranks = vec![0.0; sorted_desc.len()];
    let mut start = 0;

    while start < sorted_desc.len() {
        let mut end = start + 1;
        while end < sorted_desc.len() && sorted_desc[end] == sorted_desc[start] {
            end += 1;
        }
        // positions start+1 ..= end
        let rank = (start + 1 + end) as f64 / 2.0;
        ranks[start..end].fill(rank);
        start = end;
    }

    ranks
}

/// Build the rankings table, best team first
///
/// Every rated team gets a row; teams without a record show zeros. Rating
/// and rank are rounded to two decimals; ranks are computed on the unrounded
/// ratings.
pub fn build_power_rankings(
    ratings: &TeamRatings,
    records: &HashMap<TeamName, TeamRecord>,
) -> Vec<PowerRankingRow> {
    let mut entries: Vec<(&str, f64)> = ratings.iter().collect();
    // Stable sort: ties keep roster order
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let values: Vec<f64> = entries.iter().map(|(_, r)| *r).collect();
    let ranks = average_ranks(&values);

    entries
        .into_iter()
        .zip(ranks)
        .map(|((team, rating), rank)| {
            let record = records.get(team).copied().unwrap_or_default();
            PowerRankingRow {
                team: team.to_string(),
                wins: record.wins,
                losses: record.losses,
                rating: round2(rating),
                rank: round2(rank),
                goals_for: record.goals_for,
                goals_against: record.goals_against,
            }
        })
        .collect()
}

/// Render the table as aligned plain text
pub fn render_table(rows: &[PowerRankingRow]) -> String {
    let width = rows
        .iter()
        .map(|r| r.team.chars().count())
        .max()
        .unwrap_or(0)
        .max("Team".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:<width$}  {:>3}  {:>3}  {:>7}  {:>5}  {:>4}  {:>4}",
        "",
        "Team",
        "W",
        "L",
        "Rating",
        "Rank",
        "GS",
        "GA",
        width = width
    );
    for (i, row) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<width$}  {:>3}  {:>3}  {:>7.2}  {:>5.1}  {:>4}  {:>4}",
            i,
            row.team,
            row.wins,
            row.losses,
            row.rating,
            row.rank,
            row.goals_for,
            row.goals_against,
            width = width
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::TeamRoster;

    fn ratings(teams: &[&str], values: &[f64], home: f64) -> TeamRatings {
        let roster = TeamRoster::new(teams.iter().copied()).unwrap();
        let mut params = values.to_vec();
        params.push(home);
        roster.unpack(&params).unwrap()
    }

    #[test]
    fn test_average_ranks() {
        assert_eq!(average_ranks(&[3.0, 2.0, 1.0]), vec![1.0, 2.0, 3.0]);
        assert_eq!(average_ranks(&[3.0, 2.0, 2.0, 1.0]), vec![1.0, 2.5, 2.5, 4.0]);
        assert_eq!(average_ranks(&[1.0, 1.0, 1.0]), vec![2.0, 2.0, 2.0]);
        assert!(average_ranks(&[]).is_empty());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(-0.005001), -0.01);
        assert_eq!(round2(2.0), 2.0);
    }

    #[test]
    fn test_build_sorted_descending_with_records() {
        let r = ratings(&["A", "B", "C"], &[-0.4, 0.9, 0.1], 0.2);
        let records = HashMap::from([(
            "B".to_string(),
            TeamRecord {
                wins: 3,
                losses: 1,
                goals_for: 12,
                goals_against: 7,
            },
        )]);

        let rows = build_power_rankings(&r, &records);
        let teams: Vec<&str> = rows.iter().map(|row| row.team.as_str()).collect();
        assert_eq!(teams, vec!["B", "C", "A"]);
        assert_eq!(rows[0].rank, 1.0);
        assert_eq!(rows[0].wins, 3);
        assert_eq!(rows[0].goals_for, 12);
        // No record → zeros
        assert_eq!(rows[2].wins, 0);
        assert_eq!(rows[2].rank, 3.0);
    }

    #[test]
    fn test_ties_share_rank_and_keep_roster_order() {
        let r = ratings(&["A", "B", "C"], &[0.5, 1.0, 0.5], 0.0);
        let rows = build_power_rankings(&r, &HashMap::new());

        assert_eq!(rows[0].team, "B");
        assert_eq!(rows[1].team, "A");
        assert_eq!(rows[2].team, "C");
        assert_eq!(rows[1].rank, 2.5);
        assert_eq!(rows[2].rank, 2.5);
    }

    #[test]
    fn test_render_table_lists_every_team() {
        let r = ratings(&["Rangers", "Bruins"], &[0.3, 1.2], 0.1);
        let table = render_table(&build_power_rankings(&r, &HashMap::new()));
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Rating"));
        assert!(lines[1].contains("Bruins"));
        assert!(lines[1].contains("1.20"));
        assert!(lines[2].contains("Rangers"));
    }
}
