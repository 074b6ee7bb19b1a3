//! Match progression inside an active tournament: start, score, complete, schedule,
//! and advancing winners into the placeholders of later rounds.

use crate::models::{
    GameMatch, MatchId, MatchResult, MatchStatus, Record, Team, TeamId, Tournament,
    TournamentError, TournamentStatus,
};
use chrono::{DateTime, Utc};

fn require_active(tournament: &Tournament) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Active {
        return Err(TournamentError::InvalidState("Tournament is not active"));
    }
    Ok(())
}

/// Start a match (Active tournaments only).
pub fn start_match(tournament: &mut Tournament, match_id: MatchId) -> Result<(), TournamentError> {
    require_active(tournament)?;
    tournament
        .get_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?
        .start()?;
    tournament.touch();
    Ok(())
}

/// Update the running score of an in-progress match.
pub fn record_score(
    tournament: &mut Tournament,
    match_id: MatchId,
    team_1_score: u32,
    team_2_score: u32,
) -> Result<(), TournamentError> {
    require_active(tournament)?;
    tournament
        .get_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?
        .update_score(team_1_score, team_2_score)?;
    tournament.touch();
    Ok(())
}

/// Complete a match: derive the result, update both team records, advance the winner.
///
/// Elimination formats need a winner, so a tied score is rejected before anything changes.
pub fn complete_match(
    tournament: &mut Tournament,
    match_id: MatchId,
) -> Result<Option<MatchResult>, TournamentError> {
    require_active(tournament)?;
    let m = tournament
        .get_match(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if m.status != MatchStatus::InProgress {
        return Err(TournamentError::InvalidState("Match is not in progress"));
    }
    let expected = m.pending_result();
    if expected.is_none() && tournament.format.is_elimination() {
        return Err(TournamentError::Validation(
            "Elimination matches cannot end in a tie".to_string(),
        ));
    }
    if let Some(r) = &expected {
        check_result(&tournament.teams, r)?;
    }

    let result = tournament
        .get_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?
        .complete()?;
    if let Some(r) = &result {
        apply_result(&mut tournament.teams, r)?;
        advance_winner(&mut tournament.matches, match_id, r.winner);
    }
    tournament.touch();

    match &result {
        Some(r) => log::info!(
            "Match {} completed: {} beat {} {}-{}",
            match_id,
            tournament.team_name(r.winner).unwrap_or("?"),
            tournament.team_name(r.loser).unwrap_or("?"),
            r.winner_score,
            r.loser_score
        ),
        None => log::info!("Match {} completed as a tie", match_id),
    }
    Ok(result)
}

/// Set a match's scheduled time. Allowed in any tournament or match state.
pub fn schedule_match(
    tournament: &mut Tournament,
    match_id: MatchId,
    time: DateTime<Utc>,
) -> Result<(), TournamentError> {
    tournament
        .get_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?
        .schedule(time);
    tournament.touch();
    Ok(())
}

fn team_index(teams: &[Team], id: TeamId) -> Result<usize, TournamentError> {
    teams
        .iter()
        .position(|t| t.id == id)
        .ok_or(TournamentError::TeamNotFound(id))
}

/// Both teams' records after `result`, with their positions in `teams`. Nothing is written.
fn records_after(
    teams: &[Team],
    result: &MatchResult,
) -> Result<[(usize, Record); 2], TournamentError> {
    let winner = team_index(teams, result.winner)?;
    let loser = team_index(teams, result.loser)?;
    let overflow = |i: usize| {
        TournamentError::Validation(format!("Statistics for {} would overflow", teams[i].name))
    };
    let w = teams[winner]
        .record_after(true, result.winner_score, result.loser_score)
        .ok_or_else(|| overflow(winner))?;
    let l = teams[loser]
        .record_after(false, result.loser_score, result.winner_score)
        .ok_or_else(|| overflow(loser))?;
    Ok([(winner, w), (loser, l)])
}

/// Check that `result` can be applied to `teams`: both teams exist and no counter overflows.
pub fn check_result(teams: &[Team], result: &MatchResult) -> Result<(), TournamentError> {
    records_after(teams, result).map(|_| ())
}

/// Apply a decisive result to the team table: win/loss and goals for both sides.
/// Both new records are computed before either team is changed.
pub fn apply_result(teams: &mut [Team], result: &MatchResult) -> Result<(), TournamentError> {
    for (i, record) in records_after(teams, result)? {
        teams[i].set_record(record);
    }
    Ok(())
}

/// Put `winner` into every slot waiting on `source`. Byes that become playable are completed
/// on the spot and their entrant is advanced in turn.
fn advance_winner(matches: &mut [GameMatch], source: MatchId, winner: TeamId) {
    let mut decided = vec![(source, winner)];
    while let Some((source, team)) = decided.pop() {
        for m in matches.iter_mut() {
            if !m.resolve_winner_of(source, team) {
                continue;
            }
            if m.is_bye() && m.status == MatchStatus::Scheduled {
                m.complete_bye(team);
                log::debug!("Bye {} auto-completed", m.id);
                decided.push((m.id, team));
            }
        }
    }
}
