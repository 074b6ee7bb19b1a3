//! Match (game), Slot, and MatchStatus: a single pairing and its lifecycle.

use crate::models::team::TeamId;
use crate::models::tournament::{TournamentError, TournamentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Rounds above this offset belong to the losers bracket (double elimination).
pub const LOSERS_BRACKET_OFFSET: u32 = 100;

/// Nominal score recorded for the entrant that advances through a bye.
pub const BYE_SCORE: (u32, u32) = (1, 0);

/// One side of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Slot {
    /// A concrete team.
    Team(TeamId),
    /// Filled by the winner of another match once it is decided.
    WinnerOf(MatchId),
    /// Nobody: the bye side, or a losers-bracket side with no loser to place.
    Empty,
}

impl Slot {
    pub fn team(&self) -> Option<TeamId> {
        match self {
            Slot::Team(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<Option<TeamId>> for Slot {
    fn from(team: Option<TeamId>) -> Self {
        team.map_or(Slot::Empty, Slot::Team)
    }
}

/// Lifecycle of a match: scheduled → in-progress → completed.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
}

/// Outcome of a decisive match, used to update both team records.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MatchResult {
    pub winner: TeamId,
    pub loser: TeamId,
    pub winner_score: u32,
    pub loser_score: u32,
}

/// A single match between two slots.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub team_1: Slot,
    pub team_2: Slot,
    /// 1-based position in the bracket. Always 1 for round robin.
    pub round: u32,
    pub team_1_score: u32,
    pub team_2_score: u32,
    pub status: MatchStatus,
    /// None until completed, and for ties.
    pub winner: Option<TeamId>,
    pub loser: Option<TeamId>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub tournament_id: Option<TournamentId>,
    pub match_number: Option<u32>,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl GameMatch {
    pub fn new(team_1: Slot, team_2: Slot, round: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_1,
            team_2,
            round,
            team_1_score: 0,
            team_2_score: 0,
            status: MatchStatus::Scheduled,
            winner: None,
            loser: None,
            scheduled_time: None,
            completed_at: None,
            tournament_id: None,
            match_number: None,
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    /// A bye for `entrant`. Completed immediately when the entrant is already known;
    /// otherwise it waits for the entrant's match and completes when that one does.
    pub fn bye(entrant: Slot, round: u32) -> Self {
        let mut m = Self::new(entrant, Slot::Empty, round);
        if let Slot::Team(team) = entrant {
            m.complete_bye(team);
        }
        m
    }

    pub fn is_bye(&self) -> bool {
        self.team_2 == Slot::Empty && self.team_1 != Slot::Empty
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    pub fn is_losers_bracket(&self) -> bool {
        self.round > LOSERS_BRACKET_OFFSET
    }

    /// Whether `team` plays on either side.
    pub fn involves(&self, team: TeamId) -> bool {
        self.team_1 == Slot::Team(team) || self.team_2 == Slot::Team(team)
    }

    /// Scores as (team 1, team 2).
    pub fn score(&self) -> (u32, u32) {
        (self.team_1_score, self.team_2_score)
    }

    /// What this match feeds into the next round: the winner if known, else a placeholder.
    pub fn advancing_slot(&self) -> Slot {
        match self.winner {
            Some(team) => Slot::Team(team),
            None => Slot::WinnerOf(self.id),
        }
    }

    /// Start the match. Both sides must be concrete teams.
    pub fn start(&mut self) -> Result<(), TournamentError> {
        if self.status != MatchStatus::Scheduled {
            return Err(TournamentError::InvalidState("Match has already been started"));
        }
        if self.team_1.team().is_none() || self.team_2.team().is_none() {
            return Err(TournamentError::InvalidState(
                "Match is still waiting for its teams",
            ));
        }
        self.status = MatchStatus::InProgress;
        Ok(())
    }

    /// Store the current score (in-progress only).
    pub fn update_score(&mut self, team_1_score: u32, team_2_score: u32) -> Result<(), TournamentError> {
        if self.status != MatchStatus::InProgress {
            return Err(TournamentError::InvalidState("Match is not in progress"));
        }
        self.team_1_score = team_1_score;
        self.team_2_score = team_2_score;
        Ok(())
    }

    /// Finish the match and derive winner/loser from the scores.
    ///
    /// Returns the decisive result, or `None` for a tie. Team statistics are not touched
    /// here; the owner of the team table applies the returned result.
    pub fn complete(&mut self) -> Result<Option<MatchResult>, TournamentError> {
        if self.status != MatchStatus::InProgress {
            return Err(TournamentError::InvalidState("Match is not in progress"));
        }
        let result = self.pending_result();
        self.status = MatchStatus::Completed;
        self.completed_at = Some(Utc::now());
        self.winner = result.map(|r| r.winner);
        self.loser = result.map(|r| r.loser);
        Ok(result)
    }

    /// The result `complete()` would produce with the current scores.
    pub fn pending_result(&self) -> Option<MatchResult> {
        let (t1, t2) = (self.team_1.team()?, self.team_2.team()?);
        let (s1, s2) = self.score();
        if s1 > s2 {
            Some(MatchResult { winner: t1, loser: t2, winner_score: s1, loser_score: s2 })
        } else if s2 > s1 {
            Some(MatchResult { winner: t2, loser: t1, winner_score: s2, loser_score: s1 })
        } else {
            None
        }
    }

    /// Set the scheduled time. Allowed in any state.
    pub fn schedule(&mut self, time: DateTime<Utc>) {
        self.scheduled_time = Some(time);
    }

    /// Replace a `WinnerOf(source)` side with `team`. Returns whether anything changed.
    pub fn resolve_winner_of(&mut self, source: MatchId, team: TeamId) -> bool {
        let mut changed = false;
        for slot in [&mut self.team_1, &mut self.team_2] {
            if *slot == Slot::WinnerOf(source) {
                *slot = Slot::Team(team);
                changed = true;
            }
        }
        changed
    }

    /// Mark a bye as won by `team` with the nominal score. Statistics are left alone.
    pub(crate) fn complete_bye(&mut self, team: TeamId) {
        self.status = MatchStatus::Completed;
        self.team_1_score = BYE_SCORE.0;
        self.team_2_score = BYE_SCORE.1;
        self.winner = Some(team);
        self.loser = None;
        self.completed_at = Some(Utc::now());
    }
}
