//! Integration tests for the in-memory store: lookups, validation, standalone matches
//! and the statistics views.

use rand::rngs::StdRng;
use rand::SeedableRng;
use team_tournament_web::config::ServerConfig;
use team_tournament_web::store::{TeamUpdate, TournamentUpdate};
use team_tournament_web::{
    LeaderboardScope, MatchStatus, NewTeam, TournamentError, TournamentFormat, TournamentStatus,
    TournamentStore,
};
use uuid::Uuid;

fn store_with_tournament(format: TournamentFormat, teams: usize) -> (TournamentStore, Uuid) {
    let mut store = TournamentStore::new();
    let id = store.create_tournament("League Night", format, 8).unwrap().id;
    for i in 0..teams {
        store
            .add_team(id, NewTeam::new(format!("Team {}", i), format!("P{}a", i), format!("P{}b", i)))
            .unwrap();
    }
    (store, id)
}

#[test]
fn missing_ids_are_not_found() {
    let mut store = TournamentStore::new();
    let ghost = Uuid::new_v4();

    let err = store.get_tournament(ghost).unwrap_err();
    assert_eq!(err, TournamentError::TournamentNotFound(ghost));
    assert!(err.is_not_found());
    assert!(store.get_team(ghost).unwrap_err().is_not_found());
    assert!(store.start_match(ghost).unwrap_err().is_not_found());
    assert!(store.delete_tournament(ghost).unwrap_err().is_not_found());
    assert!(store.bracket(ghost).unwrap_err().is_not_found());
    assert!(store.leaderboard(LeaderboardScope::Tournament(ghost)).is_err());
}

#[test]
fn creation_is_validated() {
    let mut store = TournamentStore::new();
    assert!(matches!(
        store.create_tournament("   ", TournamentFormat::RoundRobin, 4),
        Err(TournamentError::Validation(_))
    ));
    assert!(matches!(
        store.create_tournament("Cup", TournamentFormat::RoundRobin, 1),
        Err(TournamentError::Validation(_))
    ));
    assert!(matches!(
        store.create_team(NewTeam::new("Nameless", "Ann", " ")),
        Err(TournamentError::Validation(_))
    ));

    let team = store.create_team(NewTeam::new("  Rockets ", "Ann", "Bob")).unwrap();
    assert_eq!(team.name, "Rockets");
    assert!(store.list_tournaments().is_empty());
}

#[test]
fn tournament_flow_through_the_store() {
    let (mut store, id) = store_with_tournament(TournamentFormat::SingleElimination, 2);
    store
        .start_tournament_with_rng(id, &mut StdRng::seed_from_u64(3))
        .unwrap();
    let match_id = store.get_tournament(id).unwrap().matches[0].id;

    store.start_match(match_id).unwrap();
    store.update_score(match_id, 3, 1).unwrap();
    let m = store.complete_match(match_id).unwrap();
    assert_eq!(m.status, MatchStatus::Completed);
    let winner = m.winner.unwrap();

    let board = store.leaderboard(LeaderboardScope::Tournament(id)).unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].id, winner);
    assert_eq!(store.leaderboard(LeaderboardScope::Global).unwrap().len(), 2);

    let bracket = store.bracket(id).unwrap();
    assert_eq!(bracket.champion, Some(store.get_team(winner).unwrap().name.clone()));

    let recent = store.recent_matches(10);
    assert_eq!(recent.len(), 1);
    assert_eq!((recent[0].team_1_score, recent[0].team_2_score), (3, 1));
    assert_eq!(recent[0].winner, recent[0].team_1);
    assert_eq!(recent[0].tournament_id, Some(id));

    let t = store.complete_tournament(id).unwrap();
    assert_eq!(t.status, TournamentStatus::Completed);
}

#[test]
fn update_tournament_is_all_or_nothing() {
    let (mut store, id) = store_with_tournament(TournamentFormat::SingleElimination, 3);

    let err = store
        .update_tournament(
            id,
            TournamentUpdate {
                name: Some("Renamed".to_string()),
                format: Some(TournamentFormat::RoundRobin),
                max_teams: Some(2),
            },
        )
        .unwrap_err();
    assert!(matches!(err, TournamentError::Validation(_)));
    let t = store.get_tournament(id).unwrap();
    assert_eq!(t.name, "League Night");
    assert_eq!(t.format, TournamentFormat::SingleElimination);

    store.start_tournament(id).unwrap();
    assert!(matches!(
        store.update_tournament(
            id,
            TournamentUpdate { max_teams: Some(16), ..Default::default() }
        ),
        Err(TournamentError::InvalidState(_))
    ));
    let t = store
        .update_tournament(
            id,
            TournamentUpdate { name: Some("Finals Night".to_string()), ..Default::default() },
        )
        .unwrap();
    assert_eq!(t.name, "Finals Night");
}

#[test]
fn tournament_teams_cannot_leave_after_start() {
    let (mut store, id) = store_with_tournament(TournamentFormat::RoundRobin, 2);
    let team_id = store.get_tournament(id).unwrap().teams[0].id;
    store.start_tournament(id).unwrap();
    assert!(matches!(store.delete_team(team_id), Err(TournamentError::InvalidState(_))));
    assert!(matches!(store.remove_team(id, team_id), Err(TournamentError::InvalidState(_))));

    let renamed = store
        .update_team(team_id, TeamUpdate { name: Some("Comets".to_string()), ..Default::default() })
        .unwrap();
    assert_eq!(renamed.name, "Comets");
}

#[test]
fn standalone_match_lifecycle() {
    let mut store = TournamentStore::new();
    let a = store.create_team(NewTeam::new("Alpha", "Ann", "Bob")).unwrap().id;
    let b = store.create_team(NewTeam::new("Bravo", "Cat", "Dan")).unwrap().id;

    assert!(matches!(store.create_match(a, a, 1), Err(TournamentError::Validation(_))));
    assert!(matches!(store.create_match(a, b, 0), Err(TournamentError::Validation(_))));
    let ghost = Uuid::new_v4();
    assert_eq!(store.create_match(a, ghost, 1).unwrap_err(), TournamentError::TeamNotFound(ghost));

    let id = store.create_match(a, b, 1).unwrap().id;
    assert!(matches!(store.complete_match(id), Err(TournamentError::InvalidState(_))));
    assert!(matches!(store.delete_team(a), Err(TournamentError::InvalidState(_))));

    store.start_match(id).unwrap();
    store.update_score(id, 2, 5).unwrap();
    let m = store.complete_match(id).unwrap();
    assert_eq!(m.winner, Some(b));
    assert_eq!(m.tournament_id, None);

    let bravo = store.get_team(b).unwrap();
    assert_eq!((bravo.wins, bravo.goals_for, bravo.goals_against), (1, 5, 2));
    assert_eq!(store.get_team(a).unwrap().losses, 1);

    store.delete_team(a).unwrap();
    assert!(store.get_team(a).unwrap_err().is_not_found());
}

#[test]
fn scheduling_parses_rfc3339() {
    let mut store = TournamentStore::new();
    let a = store.create_team(NewTeam::new("Alpha", "Ann", "Bob")).unwrap().id;
    let b = store.create_team(NewTeam::new("Bravo", "Cat", "Dan")).unwrap().id;
    let id = store.create_match(a, b, 1).unwrap().id;

    assert!(matches!(
        store.schedule_match(id, "next tuesday"),
        Err(TournamentError::Validation(_))
    ));
    let m = store.schedule_match(id, "2026-05-01T20:00:00+02:00").unwrap();
    assert_eq!(
        m.scheduled_time.map(|t| t.to_rfc3339()),
        Some("2026-05-01T18:00:00+00:00".to_string())
    );
}

#[test]
fn overview_counts_everything() {
    let (mut store, id) = store_with_tournament(TournamentFormat::RoundRobin, 3);
    store.create_tournament("Empty", TournamentFormat::SingleElimination, 4).unwrap();
    store.create_team(NewTeam::new("Loners", "P0a", "Zed")).unwrap();
    store.start_tournament(id).unwrap();

    let first = store.get_tournament(id).unwrap().matches[0].id;
    store.start_match(first).unwrap();
    store.update_score(first, 1, 0).unwrap();
    store.complete_match(first).unwrap();

    let o = store.overview();
    assert_eq!((o.tournaments.total, o.tournaments.active, o.tournaments.completed), (2, 1, 0));
    assert_eq!(o.teams, 4);
    // P0a plays for two teams
    assert_eq!(o.players, 7);
    assert_eq!((o.matches.total, o.matches.completed, o.matches.pending), (3, 1, 2));

    let players = store.player_leaderboard();
    assert_eq!(players.len(), 4);
}

#[test]
fn recent_matches_honours_the_limit() {
    let (mut store, id) = store_with_tournament(TournamentFormat::RoundRobin, 4);
    store.start_tournament(id).unwrap();
    let ids: Vec<Uuid> = store.get_tournament(id).unwrap().matches.iter().map(|m| m.id).collect();
    for m in &ids {
        store.start_match(*m).unwrap();
        store.update_score(*m, 2, 0).unwrap();
        store.complete_match(*m).unwrap();
    }
    assert_eq!(store.recent_matches(4).len(), 4);
    assert_eq!(store.recent_matches(100).len(), ids.len());
    let recent = store.recent_matches(1);
    assert!(recent[0].completed_at >= store.recent_matches(6)[5].completed_at);
}

#[test]
fn config_reads_overrides_and_falls_back() {
    let config = ServerConfig::from_lookup(|key| match key {
        "PORT" => Some("9090".to_string()),
        "DEFAULT_MAX_TEAMS" => Some("lots".to_string()),
        _ => None,
    });
    assert_eq!(config.port, 9090);
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.default_max_teams, 8);
    assert_eq!(ServerConfig::from_lookup(|_| None), ServerConfig::default());
}

#[test]
fn overflowing_statistics_leave_everything_unchanged() {
    let (mut store, id) = store_with_tournament(TournamentFormat::RoundRobin, 3);
    store.start_tournament(id).unwrap();
    let t = store.get_tournament(id).unwrap();
    let (t0, t2) = (t.teams[0].id, t.teams[2].id);
    // registration order: T0-T1, T0-T2, T1-T2
    let ids: Vec<Uuid> = t.matches.iter().map(|m| m.id).collect();

    for m in &ids[..2] {
        store.start_match(*m).unwrap();
        store.update_score(*m, u32::MAX, 0).unwrap();
    }
    store.complete_match(ids[0]).unwrap();
    assert!(matches!(store.complete_match(ids[1]), Err(TournamentError::Validation(_))));

    let m = store.get_match(ids[1]).unwrap();
    assert_eq!(m.status, MatchStatus::InProgress);
    assert_eq!(m.winner, None);
    let leader = store.get_team(t0).unwrap();
    assert_eq!((leader.wins, leader.losses, leader.goals_for), (1, 0, u32::MAX));
    assert_eq!(store.get_team(t2).unwrap().losses, 0);
    assert_eq!(store.leaderboard(LeaderboardScope::Global).unwrap().len(), 2);

    store.update_score(ids[1], 0, 1).unwrap();
    store.complete_match(ids[1]).unwrap();
    let leader = store.get_team(t0).unwrap();
    assert_eq!((leader.wins, leader.losses, leader.goals_against), (1, 1, 1));
    assert_eq!(store.get_team(t2).unwrap().wins, 1);
}

#[test]
fn standalone_overflow_is_rejected() {
    let mut store = TournamentStore::new();
    let a = store.create_team(NewTeam::new("Alpha", "Ann", "Bob")).unwrap().id;
    let b = store.create_team(NewTeam::new("Bravo", "Cat", "Dan")).unwrap().id;
    let first = store.create_match(a, b, 1).unwrap().id;
    let second = store.create_match(b, a, 2).unwrap().id;

    store.start_match(first).unwrap();
    store.update_score(first, 0, u32::MAX).unwrap();
    store.complete_match(first).unwrap();

    store.start_match(second).unwrap();
    // Bravo already has u32::MAX goals for
    store.update_score(second, 1, 0).unwrap();
    assert!(matches!(store.complete_match(second), Err(TournamentError::Validation(_))));
    assert_eq!(store.get_match(second).unwrap().status, MatchStatus::InProgress);
    let bravo = store.get_team(b).unwrap();
    assert_eq!((bravo.wins, bravo.losses, bravo.goals_against), (1, 0, 0));
    assert_eq!(store.get_team(a).unwrap().wins, 0);
}

#[test]
fn only_standalone_matches_can_be_deleted() {
    let mut store = TournamentStore::new();
    let a = store.create_team(NewTeam::new("Alpha", "Ann", "Bob")).unwrap().id;
    let b = store.create_team(NewTeam::new("Bravo", "Cat", "Dan")).unwrap().id;
    let id = store.create_match(a, b, 1).unwrap().id;

    store.delete_match(id).unwrap();
    assert_eq!(store.get_match(id).unwrap_err(), TournamentError::MatchNotFound(id));
    assert!(store.list_matches().is_empty());
    assert!(store.delete_match(id).unwrap_err().is_not_found());
    // the teams are free again
    store.delete_team(a).unwrap();

    let (mut store, tid) = store_with_tournament(TournamentFormat::RoundRobin, 2);
    store.start_tournament(tid).unwrap();
    let generated = store.get_tournament(tid).unwrap().matches[0].id;
    assert!(matches!(store.delete_match(generated), Err(TournamentError::InvalidState(_))));
    assert!(store.get_match(generated).is_ok());
}

#[test]
fn removing_a_team_before_the_start() {
    let (mut store, id) = store_with_tournament(TournamentFormat::SingleElimination, 4);
    let before: Vec<Uuid> = store.get_tournament(id).unwrap().teams.iter().map(|t| t.id).collect();

    store.remove_team(id, before[1]).unwrap();
    let after: Vec<Uuid> = store.get_tournament(id).unwrap().teams.iter().map(|t| t.id).collect();
    assert_eq!(after, [before[0], before[2], before[3]]);
    assert!(store.get_team(before[1]).unwrap_err().is_not_found());

    // unknown ids change nothing
    store.remove_team(id, Uuid::new_v4()).unwrap();
    assert_eq!(store.get_tournament(id).unwrap().teams.len(), 3);
}

#[test]
fn standings_list_every_registered_team() {
    let (mut store, id) = store_with_tournament(TournamentFormat::RoundRobin, 3);
    store.start_tournament(id).unwrap();
    let first = store.get_tournament(id).unwrap().matches[0].id;
    store.start_match(first).unwrap();
    store.update_score(first, 4, 2).unwrap();
    let winner = store.complete_match(first).unwrap().winner.unwrap();

    let table = store.standings(id).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table[0].id, winner);
    // the team that has not played (0%, +0) ranks above the loser (0%, -2)
    assert_eq!(table[1].total_games, 0);
    assert_eq!((table[2].total_games, table[2].goal_difference), (1, -2));
    assert!(store.standings(Uuid::new_v4()).unwrap_err().is_not_found());
}
