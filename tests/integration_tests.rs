//! Integration tests for the power-rankings pipeline
//!
//! These tests validate the components working together:
//! - Objective, solver and extraction on small hand-checked seasons
//! - Results page parsing through to the rankings table and CSV
//! - Error propagation for unknown teams and malformed input

mod fixtures;

use power_rankings::export::write_rankings;
use power_rankings::feed::{parse_schedule, to_game_records};
use power_rankings::rating::{extract, find_optimal_ratings, objective, residual};
use power_rankings::{rate_season, RatingError, RatingSolver, TeamRoster, TeamUniverse};

use fixtures::{game, results_page, three_team_games};

#[test]
fn test_residual_reference_value() {
    let expected = (3.0_f64 - (3.0 - 1.0 + 0.5)).powi(2);
    assert_eq!(residual(3.0, 1.0, 0.5, 3.0), expected);
    assert_eq!(residual(3.0, 1.0, 0.5, 3.0), 0.25);
}

#[test]
fn test_zero_game_stability() {
    let names = ["A", "B", "C"];
    let empty: [&str; 0] = [];

    for params in [[0.0; 4], [1.0, -2.0, 3.5, 0.25], [100.0, 0.0, -7.0, -1.0]] {
        assert_eq!(objective(&params, &names, &empty, &empty, &[]).unwrap(), 0.0);
    }

    let fit = find_optimal_ratings(&names, &empty, &empty, &[]).unwrap();
    assert!(fit.converged());
    assert_eq!(fit.ratings.to_parameters(), vec![0.0; 4]);
}

#[test]
fn test_swapped_single_game_is_symmetric() {
    let margin = 3;
    let forward = find_optimal_ratings(&["A", "B"], &["A"], &["B"], &[margin]).unwrap();
    let swapped = find_optimal_ratings(&["A", "B"], &["B"], &["A"], &[-margin]).unwrap();

    assert!(forward.objective_value < 1e-8);
    assert!(swapped.objective_value < 1e-8);
    assert!((forward.objective_value - swapped.objective_value).abs() < 1e-8);

    let f = forward.ratings.predict_margin("A", "B").unwrap();
    let s = swapped.ratings.predict_margin("B", "A").unwrap();
    assert!((f - margin as f64).abs() < 1e-4);
    assert!((s + margin as f64).abs() < 1e-4);
}

#[test]
fn test_extraction_round_trip() {
    let roster = TeamRoster::new(["Bruins", "Ducks", "Kraken"]).unwrap();
    let ratings = std::collections::HashMap::from([
        ("Bruins".to_string(), 1.375),
        ("Ducks".to_string(), -0.8125),
        ("Kraken".to_string(), 0.0625),
    ]);

    let params = roster.pack(&ratings, 0.21).unwrap();
    let (extracted, home) = extract(params.as_slice(), roster.teams()).unwrap();

    assert_eq!(extracted, ratings);
    assert_eq!(home, 0.21);
}

#[test]
fn test_unknown_home_team_is_an_error() {
    let err = objective(&[0.0; 3], &["A", "B"], &["Ghost"], &["A"], &[2]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RatingError>(),
        Some(RatingError::UnknownTeam { team }) if team == "Ghost"
    ));

    let err = find_optimal_ratings(&["A", "B"], &["Ghost"], &["A"], &[2]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RatingError>(),
        Some(RatingError::UnknownTeam { .. })
    ));
}

#[test]
fn test_misaligned_sequences_are_malformed() {
    let err = find_optimal_ratings(&["A", "B"], &["A", "B"], &["B"], &[1, 1]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RatingError>(),
        Some(RatingError::MalformedInput { .. })
    ));
}

#[test]
fn test_three_team_end_to_end() {
    let games = three_team_games();
    let roster = TeamRoster::from_games(&games, TeamUniverse::Home);
    let fit = RatingSolver::default().fit(&roster, &games).unwrap();

    assert!(fit.converged());
    assert!(fit.objective_value <= 1e-6);

    // Every observed margin is reproduced once home advantage is included
    for g in &games {
        let predicted = fit.ratings.predict_margin(&g.home_team, &g.away_team).unwrap();
        assert!((predicted - g.score_margin() as f64).abs() < 1e-3);
    }

    let a = fit.ratings.rating("A").unwrap();
    let b = fit.ratings.rating("B").unwrap();
    let c = fit.ratings.rating("C").unwrap();
    assert!(a > b && b > c);
}

#[test]
fn test_inconsistent_margins_reach_stationary_point() {
    // A and B each win at home by 4; the C games cannot also be matched
    let games = vec![
        game("A", "B", 5, 1),
        game("B", "A", 5, 1),
        game("A", "C", 1, 3),
        game("C", "B", 2, 2),
    ];
    let roster = TeamRoster::from_games(&games, TeamUniverse::All);
    let fit = RatingSolver::default().fit(&roster, &games).unwrap();

    assert!(fit.converged());
    assert!(fit.objective_value > 1.0);
    assert!(fit.gradient_norm <= 1e-5);
}

#[test]
fn test_results_page_to_rankings_csv() {
    let rows = parse_schedule(&results_page(), "table#games").unwrap();
    let games = to_game_records(&rows);
    assert_eq!(games.len(), 6);

    let report = rate_season(&games, TeamUniverse::Home, &RatingSolver::default()).unwrap();
    assert_eq!(report.rankings.len(), 3);
    assert!(report.fit.converged());

    let ratings: Vec<f64> = report.rankings.iter().map(|r| r.rating).collect();
    assert!(ratings.windows(2).all(|w| w[0] >= w[1]));

    let wins: u32 = report.rankings.iter().map(|r| r.wins).sum();
    let losses: u32 = report.rankings.iter().map(|r| r.losses).sum();
    assert_eq!(wins + losses, 12);

    let mut csv = Vec::new();
    write_rankings(&report.rankings, &mut csv).unwrap();
    let text = String::from_utf8(csv).unwrap();
    assert!(text.starts_with("Team,W,L,Rating,Rank,GS,GA\n"));
    assert_eq!(text.lines().count(), 4);
}
