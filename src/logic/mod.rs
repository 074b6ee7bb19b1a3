//! Tournament business logic: schedule generation, setup, match progression, derived views.

mod bracket;
mod bracket_view;
mod double_elimination;
mod progression;
mod round_robin;
mod setup;
mod standings;

pub use bracket::{generate_matches, seed, single_elimination};
pub use bracket_view::{bracket_view, BracketMatch, BracketRound, BracketView, SlotView};
pub use progression::{
    apply_result, check_result, complete_match, record_score, schedule_match, start_match,
};
pub use setup::{start_tournament, start_tournament_with_rng};
pub use standings::{champion, leaderboard, player_leaderboard, standings, PlayerStanding};

pub use double_elimination::generate as double_elimination;
pub use round_robin::generate as round_robin;
