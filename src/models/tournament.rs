//! Tournament, TournamentFormat and TournamentStatus.

use crate::models::game::{GameMatch, MatchId};
use crate::models::team::{Team, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Teams a tournament accepts when the caller does not say otherwise.
pub const DEFAULT_MAX_TEAMS: usize = 8;

/// Fewest teams a tournament can be started with.
pub const MIN_TEAMS_TO_START: usize = 2;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    TournamentNotFound(TournamentId),
    TeamNotFound(TeamId),
    MatchNotFound(MatchId),
    /// The tournament or match is not in a state that allows this action.
    InvalidState(&'static str),
    /// Roster is full.
    CapacityExceeded { max_teams: usize },
    /// Not enough teams to start.
    InsufficientEntrants { required: usize, actual: usize },
    /// Malformed input (missing name, bad time, ...).
    Validation(String),
}

impl TournamentError {
    /// Whether the error is about a missing tournament, team or match.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TournamentError::TournamentNotFound(_)
                | TournamentError::TeamNotFound(_)
                | TournamentError::MatchNotFound(_)
        )
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::TournamentNotFound(_) => write!(f, "Tournament not found"),
            TournamentError::TeamNotFound(_) => write!(f, "Team not found"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::InvalidState(reason) => write!(f, "{}", reason),
            TournamentError::CapacityExceeded { max_teams } => {
                write!(f, "Tournament is full ({} teams)", max_teams)
            }
            TournamentError::InsufficientEntrants { required, actual } => {
                write!(f, "Need at least {} teams to start tournament (have {})", required, actual)
            }
            TournamentError::Validation(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// How the schedule is derived from the roster.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TournamentFormat {
    #[default]
    SingleElimination,
    /// Winners bracket plus a partial losers bracket (see `logic::double_elimination`).
    DoubleElimination,
    RoundRobin,
}

impl TournamentFormat {
    pub fn is_elimination(&self) -> bool {
        !matches!(self, TournamentFormat::RoundRobin)
    }
}

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Registering teams; no matches yet.
    #[default]
    Upcoming,
    /// Roster frozen, matches generated and being played.
    Active,
    Completed,
}

/// Full tournament state: roster, generated matches, and phase.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    #[serde(rename = "type")]
    pub format: TournamentFormat,
    pub max_teams: usize,
    pub status: TournamentStatus,
    /// Registration order. Matches refer to these by id.
    pub teams: Vec<Team>,
    /// Generation order, grouped by round.
    pub matches: Vec<GameMatch>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new tournament in Upcoming state with no teams.
    pub fn new(name: impl Into<String>, format: TournamentFormat, max_teams: usize) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            format,
            max_teams,
            status: TournamentStatus::Upcoming,
            teams: Vec::new(),
            matches: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn get_team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn get_team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == id)
    }

    /// Display name of a team on the roster.
    pub fn team_name(&self, id: TeamId) -> Option<&str> {
        self.get_team(id).map(|t| t.name.as_str())
    }

    pub fn get_match(&self, id: MatchId) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut GameMatch> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Register a team (Upcoming only, up to `max_teams`).
    pub fn add_team(&mut self, team: Team) -> Result<&Team, TournamentError> {
        if self.teams.len() >= self.max_teams {
            return Err(TournamentError::CapacityExceeded { max_teams: self.max_teams });
        }
        if self.status != TournamentStatus::Upcoming {
            return Err(TournamentError::InvalidState(
                "Cannot add teams to active or completed tournament",
            ));
        }
        self.teams.push(team);
        self.touch();
        Ok(&self.teams[self.teams.len() - 1])
    }

    /// Remove a team by id (Upcoming only). Unknown ids are ignored.
    pub fn remove_team(&mut self, team_id: TeamId) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::Upcoming {
            return Err(TournamentError::InvalidState(
                "Cannot remove teams from active or completed tournament",
            ));
        }
        self.teams.retain(|t| t.id != team_id);
        self.touch();
        Ok(())
    }

    /// Change format (Upcoming only).
    pub fn set_format(&mut self, format: TournamentFormat) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::Upcoming {
            return Err(TournamentError::InvalidState(
                "Cannot change the format once the tournament has started",
            ));
        }
        self.format = format;
        self.touch();
        Ok(())
    }

    /// Change capacity (Upcoming only). Cannot drop below the current roster.
    pub fn set_max_teams(&mut self, max_teams: usize) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::Upcoming {
            return Err(TournamentError::InvalidState(
                "Cannot change the capacity once the tournament has started",
            ));
        }
        if max_teams < MIN_TEAMS_TO_START {
            return Err(TournamentError::Validation(format!(
                "max_teams must be at least {}",
                MIN_TEAMS_TO_START
            )));
        }
        if max_teams < self.teams.len() {
            return Err(TournamentError::Validation(format!(
                "max_teams cannot be below the {} registered teams",
                self.teams.len()
            )));
        }
        self.max_teams = max_teams;
        self.touch();
        Ok(())
    }

    /// Close the tournament. Unfinished matches are left as they are.
    pub fn complete(&mut self) -> Result<(), TournamentError> {
        if self.status == TournamentStatus::Completed {
            return Err(TournamentError::InvalidState("Tournament is already completed"));
        }
        self.status = TournamentStatus::Completed;
        self.touch();
        Ok(())
    }

    /// The last match of the winners bracket (elimination formats).
    pub fn final_match(&self) -> Option<&GameMatch> {
        if !self.format.is_elimination() {
            return None;
        }
        self.matches
            .iter()
            .filter(|m| !m.is_losers_bracket())
            .max_by_key(|m| m.round)
    }

    /// Number of winners-bracket rounds.
    pub fn round_count(&self) -> u32 {
        self.matches
            .iter()
            .filter(|m| !m.is_losers_bracket())
            .map(|m| m.round)
            .max()
            .unwrap_or(0)
    }
}
