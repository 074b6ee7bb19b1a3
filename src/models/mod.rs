//! Data structures for the tournament engine: teams, matches, tournament state.

mod game;
mod team;
mod tournament;

pub use game::{GameMatch, MatchId, MatchResult, MatchStatus, Slot, BYE_SCORE, LOSERS_BRACKET_OFFSET};
pub use team::{Record, Team, TeamId, TeamStats};
pub use tournament::{
    Tournament, TournamentError, TournamentFormat, TournamentId, TournamentStatus,
    DEFAULT_MAX_TEAMS, MIN_TEAMS_TO_START,
};
