//! Derived rankings: team leaderboards, per-tournament standings, player leaderboard.

use crate::models::{Team, TeamId, TeamStats, Tournament};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Win percentage descending, then goal difference descending.
fn by_rank(a: (f64, i64), b: (f64, i64)) -> Ordering {
    b.0.total_cmp(&a.0).then(b.1.cmp(&a.1))
}

/// Every team, ranked. Teams without games are kept (tournament table).
pub fn standings<'a>(teams: impl IntoIterator<Item = &'a Team>) -> Vec<TeamStats> {
    let mut rows: Vec<TeamStats> = teams.into_iter().map(Team::stats).collect();
    rows.sort_by(|a, b| {
        by_rank(
            (a.win_percentage, a.goal_difference),
            (b.win_percentage, b.goal_difference),
        )
    });
    rows
}

/// Teams with at least one decisive game, ranked.
pub fn leaderboard<'a>(teams: impl IntoIterator<Item = &'a Team>) -> Vec<TeamStats> {
    standings(teams.into_iter().filter(|t| t.games_played() > 0))
}

/// One row of the player leaderboard: a player's results summed over their teams.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerStanding {
    pub name: String,
    pub teams: Vec<String>,
    pub wins: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub win_percentage: f64,
    pub goal_difference: i64,
    pub total_games: u32,
}

/// Players ranked by the records of the teams they played in. Players without games are left out.
pub fn player_leaderboard<'a>(teams: impl IntoIterator<Item = &'a Team>) -> Vec<PlayerStanding> {
    let mut rows: Vec<PlayerStanding> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for team in teams {
        for (slot, name) in team.players().into_iter().enumerate() {
            // same name twice on one team counts once
            if slot == 1 && name == team.player_1 {
                continue;
            }
            let i = *index.entry(name.to_string()).or_insert_with(|| {
                rows.push(PlayerStanding {
                    name: name.to_string(),
                    teams: Vec::new(),
                    wins: 0,
                    losses: 0,
                    goals_for: 0,
                    goals_against: 0,
                    win_percentage: 0.0,
                    goal_difference: 0,
                    total_games: 0,
                });
                rows.len() - 1
            });
            let row = &mut rows[i];
            row.teams.push(team.name.clone());
            // sums over several teams saturate
            row.wins = row.wins.saturating_add(team.wins);
            row.losses = row.losses.saturating_add(team.losses);
            row.goals_for = row.goals_for.saturating_add(team.goals_for);
            row.goals_against = row.goals_against.saturating_add(team.goals_against);
        }
    }

    for row in &mut rows {
        row.total_games = row.wins.saturating_add(row.losses);
        row.goal_difference = i64::from(row.goals_for) - i64::from(row.goals_against);
        if row.total_games > 0 {
            row.win_percentage = f64::from(row.wins) / f64::from(row.total_games) * 100.0;
        }
    }
    rows.retain(|r| r.total_games > 0);
    rows.sort_by(|a, b| {
        by_rank(
            (a.win_percentage, a.goal_difference),
            (b.win_percentage, b.goal_difference),
        )
    });
    rows
}

/// The tournament's winner once it is known: the final's winner for elimination formats,
/// the standings leader for round robin after every match is completed.
pub fn champion(tournament: &Tournament) -> Option<TeamId> {
    if tournament.format.is_elimination() {
        return tournament.final_match().and_then(|m| m.winner);
    }
    if tournament.matches.is_empty() || !tournament.matches.iter().all(|m| m.is_completed()) {
        return None;
    }
    // all ties: nobody has won anything
    standings(&tournament.teams)
        .first()
        .filter(|s| s.total_games > 0)
        .map(|s| s.id)
}
