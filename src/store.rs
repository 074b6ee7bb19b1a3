//! In-memory store for tournaments, standalone teams and standalone matches.
//!
//! This is the operation-level surface the web layer calls. Every method either applies
//! fully or returns an error without changing anything.

use crate::logic::{
    self, apply_result, bracket_view, check_result, leaderboard, player_leaderboard, standings,
    BracketView, PlayerStanding,
};
use crate::models::{
    GameMatch, MatchId, MatchStatus, Slot, Team, TeamId, TeamStats, Tournament, TournamentError,
    TournamentFormat, TournamentId, TournamentStatus, MIN_TEAMS_TO_START,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Fields for registering a team.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewTeam {
    pub name: String,
    pub player_1: String,
    pub player_2: String,
}

impl NewTeam {
    pub fn new(
        name: impl Into<String>,
        player_1: impl Into<String>,
        player_2: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            player_1: player_1.into(),
            player_2: player_2.into(),
        }
    }

    fn into_team(self) -> Result<Team, TournamentError> {
        let name = required(&self.name, "Team name")?;
        let player_1 = required(&self.player_1, "Player 1")?;
        let player_2 = required(&self.player_2, "Player 2")?;
        Ok(Team::new(name, player_1, player_2))
    }
}

/// Partial team update; absent fields are left alone.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TeamUpdate {
    pub name: Option<String>,
    pub player_1: Option<String>,
    pub player_2: Option<String>,
}

/// Partial tournament update. Format and capacity can only change before the start.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TournamentUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub format: Option<TournamentFormat>,
    pub max_teams: Option<usize>,
}

/// Which teams a leaderboard ranks.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LeaderboardScope {
    Global,
    Tournament(TournamentId),
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct TournamentCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MatchCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// Headline counts for the statistics page.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Overview {
    pub tournaments: TournamentCounts,
    pub teams: usize,
    pub players: usize,
    pub matches: MatchCounts,
}

/// A completed match for the "recent results" list.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecentMatch {
    pub id: MatchId,
    pub team_1: Option<String>,
    pub team_2: Option<String>,
    pub team_1_score: u32,
    pub team_2_score: u32,
    pub winner: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub tournament_id: Option<TournamentId>,
}

/// Results shown by `recent_matches` when the caller gives no limit.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

enum MatchHome {
    Tournament(TournamentId),
    Standalone(usize),
}

fn required(value: &str, field: &str) -> Result<String, TournamentError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TournamentError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn parse_time(value: &str) -> Result<DateTime<Utc>, TournamentError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| TournamentError::Validation(format!("Invalid scheduled time: {}", e)))
}

#[derive(Debug, Default)]
pub struct TournamentStore {
    tournaments: HashMap<TournamentId, Tournament>,
    /// Teams created outside any tournament.
    teams: Vec<Team>,
    /// Matches created by hand between standalone teams.
    matches: Vec<GameMatch>,
}

impl TournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- tournaments ----

    pub fn create_tournament(
        &mut self,
        name: &str,
        format: TournamentFormat,
        max_teams: usize,
    ) -> Result<&Tournament, TournamentError> {
        let name = required(name, "Tournament name")?;
        if max_teams < MIN_TEAMS_TO_START {
            return Err(TournamentError::Validation(format!(
                "max_teams must be at least {}",
                MIN_TEAMS_TO_START
            )));
        }
        let tournament = Tournament::new(name, format, max_teams);
        let id = tournament.id;
        log::info!("Created tournament {} ({:?}, max {} teams)", id, format, max_teams);
        Ok(&*self.tournaments.entry(id).or_insert(tournament))
    }

    /// All tournaments, oldest first.
    pub fn list_tournaments(&self) -> Vec<&Tournament> {
        let mut list: Vec<&Tournament> = self.tournaments.values().collect();
        list.sort_by_key(|t| t.created_at);
        list
    }

    pub fn get_tournament(&self, id: TournamentId) -> Result<&Tournament, TournamentError> {
        self.tournaments
            .get(&id)
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    fn tournament_mut(&mut self, id: TournamentId) -> Result<&mut Tournament, TournamentError> {
        self.tournaments
            .get_mut(&id)
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    pub fn update_tournament(
        &mut self,
        id: TournamentId,
        update: TournamentUpdate,
    ) -> Result<&Tournament, TournamentError> {
        let name = update
            .name
            .as_deref()
            .map(|n| required(n, "Tournament name"))
            .transpose()?;
        let t = self.tournament_mut(id)?;
        if (update.format.is_some() || update.max_teams.is_some())
            && t.status != TournamentStatus::Upcoming
        {
            return Err(TournamentError::InvalidState(
                "Cannot change format or capacity once the tournament has started",
            ));
        }
        if let Some(max_teams) = update.max_teams {
            t.set_max_teams(max_teams)?;
        }
        if let Some(format) = update.format {
            t.set_format(format)?;
        }
        if let Some(name) = name {
            t.name = name;
            t.touch();
        }
        Ok(&*t)
    }

    pub fn delete_tournament(&mut self, id: TournamentId) -> Result<(), TournamentError> {
        self.tournaments
            .remove(&id)
            .ok_or(TournamentError::TournamentNotFound(id))?;
        log::info!("Deleted tournament {}", id);
        Ok(())
    }

    /// Register a new team in a tournament.
    pub fn add_team(
        &mut self,
        tournament_id: TournamentId,
        team: NewTeam,
    ) -> Result<&Team, TournamentError> {
        let team = team.into_team()?;
        self.tournament_mut(tournament_id)?.add_team(team)
    }

    pub fn remove_team(
        &mut self,
        tournament_id: TournamentId,
        team_id: TeamId,
    ) -> Result<(), TournamentError> {
        self.tournament_mut(tournament_id)?.remove_team(team_id)
    }

    pub fn start_tournament(&mut self, id: TournamentId) -> Result<&Tournament, TournamentError> {
        self.start_tournament_with_rng(id, &mut rand::thread_rng())
    }

    pub fn start_tournament_with_rng<R: Rng + ?Sized>(
        &mut self,
        id: TournamentId,
        rng: &mut R,
    ) -> Result<&Tournament, TournamentError> {
        let t = self.tournament_mut(id)?;
        logic::start_tournament_with_rng(t, rng)?;
        Ok(&*t)
    }

    pub fn complete_tournament(&mut self, id: TournamentId) -> Result<&Tournament, TournamentError> {
        let t = self.tournament_mut(id)?;
        t.complete()?;
        log::info!("Tournament {} completed", id);
        Ok(&*t)
    }

    pub fn bracket(&self, id: TournamentId) -> Result<BracketView, TournamentError> {
        Ok(bracket_view(self.get_tournament(id)?))
    }

    /// Full table for one tournament, including teams that have not played yet.
    pub fn standings(&self, id: TournamentId) -> Result<Vec<TeamStats>, TournamentError> {
        Ok(standings(&self.get_tournament(id)?.teams))
    }

    // ---- teams ----

    /// Standalone teams first, then each tournament's roster.
    fn all_teams(&self) -> impl Iterator<Item = &Team> {
        self.teams
            .iter()
            .chain(self.list_tournaments().into_iter().flat_map(|t| t.teams.iter()))
    }

    pub fn create_team(&mut self, team: NewTeam) -> Result<&Team, TournamentError> {
        let team = team.into_team()?;
        self.teams.push(team);
        Ok(&self.teams[self.teams.len() - 1])
    }

    pub fn list_teams(&self) -> Vec<&Team> {
        self.all_teams().collect()
    }

    pub fn get_team(&self, id: TeamId) -> Result<&Team, TournamentError> {
        self.all_teams()
            .find(|t| t.id == id)
            .ok_or(TournamentError::TeamNotFound(id))
    }

    fn team_mut(&mut self, id: TeamId) -> Result<&mut Team, TournamentError> {
        if let Some(i) = self.teams.iter().position(|t| t.id == id) {
            return Ok(&mut self.teams[i]);
        }
        self.tournaments
            .values_mut()
            .find_map(|t| t.get_team_mut(id))
            .ok_or(TournamentError::TeamNotFound(id))
    }

    /// Rename a team or its players. Statistics are untouched.
    pub fn update_team(&mut self, id: TeamId, update: TeamUpdate) -> Result<&Team, TournamentError> {
        let name = update.name.as_deref().map(|v| required(v, "Team name")).transpose()?;
        let player_1 = update.player_1.as_deref().map(|v| required(v, "Player 1")).transpose()?;
        let player_2 = update.player_2.as_deref().map(|v| required(v, "Player 2")).transpose()?;
        let team = self.team_mut(id)?;
        if let Some(name) = name {
            team.name = name;
        }
        if let Some(p) = player_1 {
            team.player_1 = p;
        }
        if let Some(p) = player_2 {
            team.player_2 = p;
        }
        Ok(&*team)
    }

    /// Delete a standalone team, or remove a tournament team under its tournament's rules.
    pub fn delete_team(&mut self, id: TeamId) -> Result<(), TournamentError> {
        if let Some(i) = self.teams.iter().position(|t| t.id == id) {
            let busy = self
                .matches
                .iter()
                .any(|m| !m.is_completed() && m.involves(id));
            if busy {
                return Err(TournamentError::InvalidState(
                    "Team still has matches to play",
                ));
            }
            self.teams.remove(i);
            return Ok(());
        }
        let t = self
            .tournaments
            .values_mut()
            .find(|t| t.get_team(id).is_some())
            .ok_or(TournamentError::TeamNotFound(id))?;
        t.remove_team(id)
    }

    // ---- matches ----

    /// A hand-made match between two standalone teams.
    pub fn create_match(
        &mut self,
        team_1: TeamId,
        team_2: TeamId,
        round: u32,
    ) -> Result<&GameMatch, TournamentError> {
        if round == 0 {
            return Err(TournamentError::Validation("Round must be at least 1".to_string()));
        }
        if team_1 == team_2 {
            return Err(TournamentError::Validation(
                "A team cannot play against itself".to_string(),
            ));
        }
        for id in [team_1, team_2] {
            if !self.teams.iter().any(|t| t.id == id) {
                return Err(TournamentError::TeamNotFound(id));
            }
        }
        self.matches
            .push(GameMatch::new(Slot::Team(team_1), Slot::Team(team_2), round));
        Ok(&self.matches[self.matches.len() - 1])
    }

    fn locate_match(&self, id: MatchId) -> Result<MatchHome, TournamentError> {
        if let Some(i) = self.matches.iter().position(|m| m.id == id) {
            return Ok(MatchHome::Standalone(i));
        }
        self.tournaments
            .values()
            .find(|t| t.get_match(id).is_some())
            .map(|t| MatchHome::Tournament(t.id))
            .ok_or(TournamentError::MatchNotFound(id))
    }

    pub fn get_match(&self, id: MatchId) -> Result<&GameMatch, TournamentError> {
        match self.locate_match(id)? {
            MatchHome::Standalone(i) => Ok(&self.matches[i]),
            MatchHome::Tournament(tid) => self
                .get_tournament(tid)?
                .get_match(id)
                .ok_or(TournamentError::MatchNotFound(id)),
        }
    }

    /// Standalone matches, then each tournament's matches in generation order.
    pub fn list_matches(&self) -> Vec<&GameMatch> {
        self.matches
            .iter()
            .chain(self.list_tournaments().into_iter().flat_map(|t| t.matches.iter()))
            .collect()
    }

    pub fn start_match(&mut self, id: MatchId) -> Result<&GameMatch, TournamentError> {
        match self.locate_match(id)? {
            MatchHome::Standalone(i) => self.matches[i].start()?,
            MatchHome::Tournament(tid) => logic::start_match(self.tournament_mut(tid)?, id)?,
        }
        self.get_match(id)
    }

    pub fn update_score(
        &mut self,
        id: MatchId,
        team_1_score: u32,
        team_2_score: u32,
    ) -> Result<&GameMatch, TournamentError> {
        match self.locate_match(id)? {
            MatchHome::Standalone(i) => self.matches[i].update_score(team_1_score, team_2_score)?,
            MatchHome::Tournament(tid) => {
                logic::record_score(self.tournament_mut(tid)?, id, team_1_score, team_2_score)?
            }
        }
        self.get_match(id)
    }

    pub fn complete_match(&mut self, id: MatchId) -> Result<&GameMatch, TournamentError> {
        match self.locate_match(id)? {
            MatchHome::Standalone(i) => {
                let m = &self.matches[i];
                if m.status != MatchStatus::InProgress {
                    return Err(TournamentError::InvalidState("Match is not in progress"));
                }
                if let Some(r) = m.pending_result() {
                    check_result(&self.teams, &r)?;
                }
                if let Some(r) = self.matches[i].complete()? {
                    apply_result(&mut self.teams, &r)?;
                }
            }
            MatchHome::Tournament(tid) => {
                logic::complete_match(self.tournament_mut(tid)?, id)?;
            }
        }
        self.get_match(id)
    }

    /// Delete a standalone match. Generated matches belong to their tournament and stay.
    pub fn delete_match(&mut self, id: MatchId) -> Result<(), TournamentError> {
        match self.locate_match(id)? {
            MatchHome::Standalone(i) => {
                self.matches.remove(i);
                log::info!("Deleted match {}", id);
                Ok(())
            }
            MatchHome::Tournament(_) => Err(TournamentError::InvalidState(
                "Tournament matches cannot be deleted",
            )),
        }
    }

    /// Set a match's time from an RFC 3339 string.
    pub fn schedule_match(&mut self, id: MatchId, time: &str) -> Result<&GameMatch, TournamentError> {
        let time = parse_time(time)?;
        match self.locate_match(id)? {
            MatchHome::Standalone(i) => self.matches[i].schedule(time),
            MatchHome::Tournament(tid) => logic::schedule_match(self.tournament_mut(tid)?, id, time)?,
        }
        self.get_match(id)
    }

    // ---- statistics ----

    pub fn leaderboard(&self, scope: LeaderboardScope) -> Result<Vec<TeamStats>, TournamentError> {
        match scope {
            LeaderboardScope::Global => Ok(leaderboard(self.all_teams())),
            LeaderboardScope::Tournament(id) => Ok(leaderboard(&self.get_tournament(id)?.teams)),
        }
    }

    pub fn player_leaderboard(&self) -> Vec<PlayerStanding> {
        player_leaderboard(self.all_teams())
    }

    pub fn overview(&self) -> Overview {
        let tournaments = self.tournaments.values();
        let matches = self.list_matches();
        let completed_matches = matches.iter().filter(|m| m.is_completed()).count();
        let players: HashSet<&str> = self.all_teams().flat_map(|t| t.players()).collect();

        Overview {
            tournaments: TournamentCounts {
                total: self.tournaments.len(),
                active: tournaments
                    .clone()
                    .filter(|t| t.status == TournamentStatus::Active)
                    .count(),
                completed: tournaments
                    .filter(|t| t.status == TournamentStatus::Completed)
                    .count(),
            },
            teams: self.all_teams().count(),
            players: players.len(),
            matches: MatchCounts {
                total: matches.len(),
                completed: completed_matches,
                pending: matches.len() - completed_matches,
            },
        }
    }

    fn team_name_for(&self, m: &GameMatch, id: TeamId) -> Option<String> {
        let name = match m.tournament_id.and_then(|tid| self.tournaments.get(&tid)) {
            Some(t) => t.team_name(id),
            None => self.teams.iter().find(|t| t.id == id).map(|t| t.name.as_str()),
        };
        name.map(str::to_string)
    }

    /// Completed matches, most recent first.
    pub fn recent_matches(&self, limit: usize) -> Vec<RecentMatch> {
        let mut done: Vec<&GameMatch> = self
            .list_matches()
            .into_iter()
            .filter(|m| m.is_completed())
            .collect();
        done.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        done.into_iter()
            .take(limit)
            .map(|m| RecentMatch {
                id: m.id,
                team_1: m.team_1.team().and_then(|id| self.team_name_for(m, id)),
                team_2: m.team_2.team().and_then(|id| self.team_name_for(m, id)),
                team_1_score: m.team_1_score,
                team_2_score: m.team_2_score,
                winner: m.winner.and_then(|id| self.team_name_for(m, id)),
                completed_at: m.completed_at,
                tournament_id: m.tournament_id,
            })
            .collect()
    }
}
