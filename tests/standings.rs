//! Integration tests for team standings, leaderboards and the player leaderboard.

use team_tournament_web::{leaderboard, player_leaderboard, standings, Team};

fn record(name: &str, players: (&str, &str), wins: u32, losses: u32, gf: u32, ga: u32) -> Team {
    let mut t = Team::new(name, players.0, players.1);
    t.wins = wins;
    t.losses = losses;
    t.goals_for = gf;
    t.goals_against = ga;
    t
}

fn table() -> Vec<Team> {
    vec![
        record("C", ("Cat", "Dan"), 1, 1, 3, 4),
        record("D", ("Eve", "Fay"), 0, 0, 0, 0),
        record("A", ("Bob", "Ann"), 2, 0, 5, 1),
        record("B", ("Ann", "Cat"), 1, 1, 6, 2),
    ]
}

#[test]
fn leaderboard_orders_by_win_rate_then_goal_difference() {
    let teams = table();
    let rows = leaderboard(&teams);
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["A", "B", "C"]);

    assert_eq!(rows[0].win_percentage, 100.0);
    assert_eq!(rows[1].win_percentage, 50.0);
    assert_eq!(rows[1].goal_difference, 4);
    assert_eq!(rows[2].goal_difference, -1);
    assert_eq!(rows[2].total_games, 2);
}

#[test]
fn standings_keep_teams_without_games() {
    let teams = table();
    let names: Vec<String> = standings(&teams).into_iter().map(|r| r.name).collect();
    assert_eq!(names, ["A", "B", "C", "D"]);
}

#[test]
fn empty_table_has_no_rows() {
    let teams: Vec<Team> = Vec::new();
    assert!(leaderboard(&teams).is_empty());
    assert!(player_leaderboard(&teams).is_empty());
}

#[test]
fn players_aggregate_across_teams() {
    let teams = table();
    let rows = player_leaderboard(&teams);
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    // Eve and Fay have not played
    assert_eq!(names, ["Bob", "Ann", "Cat", "Dan"]);

    let ann = &rows[1];
    assert_eq!(ann.teams, ["A", "B"]);
    assert_eq!((ann.wins, ann.losses), (3, 1));
    assert_eq!((ann.goals_for, ann.goals_against), (11, 3));
    assert_eq!(ann.win_percentage, 75.0);
    assert_eq!(ann.goal_difference, 8);

    // Cat: B (+4) and C (-1) → 50%, +3, ahead of Dan at 50%, -1
    let cat = &rows[2];
    assert_eq!(cat.total_games, 4);
    assert_eq!(cat.goal_difference, 3);
}

#[test]
fn same_player_twice_on_a_team_counts_once() {
    let teams = vec![record("Solo", ("Max", "Max"), 1, 0, 2, 0)];
    let rows = player_leaderboard(&teams);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].wins, 1);
    assert_eq!(rows[0].teams, ["Solo"]);
}
