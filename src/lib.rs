//! Team tournament web app: library with models, bracket engine and in-memory store.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    bracket_view, champion, complete_match, generate_matches, leaderboard, player_leaderboard,
    record_score, schedule_match, standings, start_match, start_tournament,
    start_tournament_with_rng, BracketView, PlayerStanding,
};
pub use models::{
    GameMatch, MatchId, MatchResult, MatchStatus, Slot, Team, TeamId, TeamStats, Tournament,
    TournamentError, TournamentFormat, TournamentId, TournamentStatus,
};
pub use store::{LeaderboardScope, NewTeam, TournamentStore};
