//! Setup phase: start tournament (Upcoming → Active) and generate its matches.

use crate::logic::bracket::generate_matches;
use crate::models::{
    TeamId, Tournament, TournamentError, TournamentStatus, MIN_TEAMS_TO_START,
};
use rand::Rng;

/// Start the tournament with thread-local randomness for seeding.
pub fn start_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    start_tournament_with_rng(tournament, &mut rand::thread_rng())
}

/// Start the tournament: require at least 2 teams, freeze the roster, generate the matches.
pub fn start_tournament_with_rng<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Upcoming {
        return Err(TournamentError::InvalidState("Tournament has already been started"));
    }
    if tournament.teams.len() < MIN_TEAMS_TO_START {
        return Err(TournamentError::InsufficientEntrants {
            required: MIN_TEAMS_TO_START,
            actual: tournament.teams.len(),
        });
    }

    let entrants: Vec<TeamId> = tournament.teams.iter().map(|t| t.id).collect();
    tournament.matches = generate_matches(tournament.format, &entrants, tournament.id, rng);
    tournament.status = TournamentStatus::Active;
    tournament.touch();

    log::info!(
        "Tournament {} started: {} teams, {} matches",
        tournament.id,
        tournament.teams.len(),
        tournament.matches.len()
    );
    Ok(())
}
