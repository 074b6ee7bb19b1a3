//! Read-only bracket projection: matches grouped by round for display.

use crate::logic::standings::champion;
use crate::models::{
    GameMatch, MatchId, MatchStatus, Slot, TeamId, Tournament, TournamentFormat, TournamentId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A match side as shown in the bracket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotView {
    Team { id: TeamId, name: String },
    /// Not decided yet, e.g. "Winner of match 3".
    Pending { match_id: MatchId, label: String },
    Empty,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub id: MatchId,
    pub match_number: Option<u32>,
    pub team_1: SlotView,
    pub team_2: SlotView,
    pub team_1_score: u32,
    pub team_2_score: u32,
    /// Winner's name.
    pub winner: Option<String>,
    pub status: MatchStatus,
    pub scheduled_time: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BracketRound {
    pub round: u32,
    pub losers_bracket: bool,
    pub matches: Vec<BracketMatch>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BracketView {
    pub tournament_id: TournamentId,
    #[serde(rename = "type")]
    pub format: TournamentFormat,
    /// Ascending round number; losers-bracket rounds (> 100) come last.
    pub rounds: Vec<BracketRound>,
    pub champion: Option<String>,
}

fn team_name(tournament: &Tournament, id: TeamId) -> String {
    tournament.team_name(id).unwrap_or("Unknown team").to_string()
}

fn slot_view(tournament: &Tournament, slot: Slot) -> SlotView {
    match slot {
        Slot::Team(id) => SlotView::Team { id, name: team_name(tournament, id) },
        Slot::WinnerOf(match_id) => {
            let label = match tournament.get_match(match_id).and_then(|m| m.match_number) {
                Some(n) => format!("Winner of match {}", n),
                None => "Winner of previous match".to_string(),
            };
            SlotView::Pending { match_id, label }
        }
        Slot::Empty => SlotView::Empty,
    }
}

fn match_view(tournament: &Tournament, m: &GameMatch) -> BracketMatch {
    BracketMatch {
        id: m.id,
        match_number: m.match_number,
        team_1: slot_view(tournament, m.team_1),
        team_2: slot_view(tournament, m.team_2),
        team_1_score: m.team_1_score,
        team_2_score: m.team_2_score,
        winner: m.winner.map(|id| team_name(tournament, id)),
        status: m.status,
        scheduled_time: m.scheduled_time,
    }
}

/// Group the tournament's matches by round (ascending), keeping generation order inside a round.
pub fn bracket_view(tournament: &Tournament) -> BracketView {
    let mut by_round: BTreeMap<u32, Vec<BracketMatch>> = BTreeMap::new();
    for m in &tournament.matches {
        by_round
            .entry(m.round)
            .or_default()
            .push(match_view(tournament, m));
    }

    BracketView {
        tournament_id: tournament.id,
        format: tournament.format,
        rounds: by_round
            .into_iter()
            .map(|(round, matches)| BracketRound {
                round,
                losers_bracket: round > crate::models::LOSERS_BRACKET_OFFSET,
                matches,
            })
            .collect(),
        champion: champion(tournament).map(|id| team_name(tournament, id)),
    }
}
