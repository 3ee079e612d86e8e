//! Test fixtures shared by the integration tests

#![allow(dead_code)]

use power_rankings::GameRecord;

/// Completed game without a date
pub fn game(home: &str, away: &str, home_score: u32, away_score: u32) -> GameRecord {
    GameRecord::new(home, away, home_score, away_score)
}

/// A(home) 3-1 B, B(home) 2-2 C, C(home) 1-4 A
pub fn three_team_games() -> Vec<GameRecord> {
    vec![game("A", "B", 3, 1), game("B", "C", 2, 2), game("C", "A", 1, 4)]
}

/// A results page in the layout of a season games table: visitor first,
/// a repeated header row mid-table, unplayed games with empty scores and a
/// 0-0 placeholder row
pub fn results_page() -> String {
    let played = [
        ("2022-10-07", "Seattle Kraken", 3, "Boston Bruins", 5),
        ("2022-10-08", "Anaheim Ducks", 2, "Seattle Kraken", 4),
        ("2022-10-09", "Boston Bruins", 4, "Anaheim Ducks", 1),
        ("2022-10-11", "Boston Bruins", 2, "Seattle Kraken", 3),
        ("2022-10-12", "Seattle Kraken", 6, "Anaheim Ducks", 2),
        ("2022-10-14", "Anaheim Ducks", 1, "Boston Bruins", 3),
    ];

    let mut body = String::new();
    for (i, (date, away, away_goals, home, home_goals)) in played.iter().enumerate() {
        if i == 3 {
            body.push_str(
                "<tr class=\"thead\"><th>Date</th><th>Visitor</th><th>G</th>\
                 <th>Home</th><th>G</th><th></th><th>Att.</th></tr>\n",
            );
        }
        body.push_str(&format!(
            "<tr><th scope=\"row\">{}</th><td><a href=\"#\">{}</a></td><td>{}</td>\
             <td><a href=\"#\">{}</a></td><td>{}</td><td></td><td>18,000</td></tr>\n",
            date, away, away_goals, home, home_goals
        ));
    }
    body.push_str(
        "<tr><th scope=\"row\">2023-04-13</th><td>Boston Bruins</td><td></td>\
         <td>Seattle Kraken</td><td></td><td></td><td></td></tr>\n",
    );
    body.push_str(
        "<tr><th scope=\"row\">2023-04-14</th><td>Anaheim Ducks</td><td>0</td>\
         <td>Boston Bruins</td><td>0</td><td></td><td></td></tr>\n",
    );

    format!(
        "<html><body><h2>Regular Season</h2>\
         <table id=\"games\"><thead><tr><th>Date</th><th>Visitor</th><th>G</th>\
         <th>Home</th><th>G</th><th></th><th>Att.</th></tr></thead>\
         <tbody>\n{}</tbody></table></body></html>",
        body
    )
}
