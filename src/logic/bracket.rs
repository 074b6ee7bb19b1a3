//! Schedule generation: seeding, format dispatch, and the single-elimination bracket.

use crate::logic::{double_elimination, round_robin};
use crate::models::{GameMatch, Slot, TeamId, TournamentFormat, TournamentId};
use rand::seq::SliceRandom;
use rand::Rng;

/// Random seeding: a uniform shuffle of the entrants.
pub fn seed<R: Rng + ?Sized>(entrants: &[TeamId], rng: &mut R) -> Vec<TeamId> {
    let mut seeded = entrants.to_vec();
    seeded.shuffle(rng);
    seeded
}

/// Build every match for `format` from the roster snapshot.
///
/// Elimination formats are seeded with `rng` first; round robin keeps registration order.
/// Matches are numbered from 1 in generation order.
pub fn generate_matches<R: Rng + ?Sized>(
    format: TournamentFormat,
    entrants: &[TeamId],
    tournament_id: TournamentId,
    rng: &mut R,
) -> Vec<GameMatch> {
    let mut matches = match format {
        TournamentFormat::SingleElimination => single_elimination(&seed(entrants, rng)),
        TournamentFormat::DoubleElimination => {
            double_elimination::generate(&seed(entrants, rng))
        }
        TournamentFormat::RoundRobin => round_robin::generate(entrants),
    };
    for (i, m) in matches.iter_mut().enumerate() {
        m.tournament_id = Some(tournament_id);
        m.match_number = Some(i as u32 + 1);
    }
    log::debug!(
        "Generated {} matches for {} entrants ({:?})",
        matches.len(),
        entrants.len(),
        format
    );
    matches
}

/// Pre-build a single-elimination bracket over already-seeded entrants.
///
/// Round 1 pairs `(0, 1), (2, 3), ...`; an odd entrant out gets a bye. Later rounds pair the
/// slots advanced by the previous round: the winner itself when already known (a bye over a
/// concrete team), otherwise `Slot::WinnerOf` the match.
pub fn single_elimination(seeded: &[TeamId]) -> Vec<GameMatch> {
    let mut current: Vec<Slot> = seeded.iter().copied().map(Slot::Team).collect();
    let mut matches = Vec::new();
    let mut round = 1;

    while current.len() > 1 {
        let mut next = Vec::with_capacity(current.len().div_ceil(2));
        for pair in current.chunks(2) {
            let m = match pair.get(1) {
                Some(&team_2) => GameMatch::new(pair[0], team_2, round),
                None => {
                    log::debug!("Round {}: bye for {:?}", round, pair[0]);
                    GameMatch::bye(pair[0], round)
                }
            };
            next.push(m.advancing_slot());
            matches.push(m);
        }
        current = next;
        round += 1;
    }

    matches
}
