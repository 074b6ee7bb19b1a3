//! Double elimination (partial).
//!
//! Only the winners bracket is real. The losers bracket is one placeholder match per
//! winners-bracket match that already has a result at generation time, which for a freshly
//! seeded bracket means the byes. Byes have no loser, so those placeholders have no teams.
//! There is no losers-bracket advancement and no grand final.

use crate::logic::bracket::single_elimination;
use crate::models::{GameMatch, Slot, TeamId, LOSERS_BRACKET_OFFSET};

pub fn generate(seeded: &[TeamId]) -> Vec<GameMatch> {
    let mut matches = single_elimination(seeded);

    let losers: Vec<GameMatch> = matches
        .iter()
        .filter(|m| m.is_completed())
        .map(|m| {
            GameMatch::new(
                Slot::from(m.loser),
                Slot::Empty,
                m.round + LOSERS_BRACKET_OFFSET,
            )
        })
        .collect();

    log::debug!("Losers bracket: {} placeholder matches", losers.len());
    matches.extend(losers);
    matches
}
