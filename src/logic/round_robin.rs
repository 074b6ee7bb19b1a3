//! Round robin: every pair of entrants meets once.

use crate::models::{GameMatch, Slot, TeamId};

/// All `n(n-1)/2` pairings in registration order (`i`, then every `j > i`), all in round 1.
pub fn generate(entrants: &[TeamId]) -> Vec<GameMatch> {
    let mut matches = Vec::with_capacity(entrants.len() * entrants.len().saturating_sub(1) / 2);
    for (i, &home) in entrants.iter().enumerate() {
        for &away in &entrants[i + 1..] {
            matches.push(GameMatch::new(Slot::Team(home), Slot::Team(away), 1));
        }
    }
    matches
}
