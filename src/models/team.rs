//! Team and TeamStats data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team (used in matches and lookups).
pub type TeamId = Uuid;

/// Statistics view of a team (for API / display).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub id: TeamId,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub win_percentage: f64,
    pub goal_difference: i64,
    pub total_games: u32,
}

impl TeamStats {
    pub fn from_team(t: &Team) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            wins: t.wins,
            losses: t.losses,
            goals_for: t.goals_for,
            goals_against: t.goals_against,
            win_percentage: t.win_percentage(),
            goal_difference: t.goal_difference(),
            total_games: t.games_played(),
        }
    }
}

/// Win/loss and goal counters: the part of a team a match result changes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

/// A two-player team. Statistics are cumulative over every decisive match it completed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub player_1: String,
    pub player_2: String,
    pub wins: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Create a new team. Statistics start at zero.
    pub fn new(
        name: impl Into<String>,
        player_1: impl Into<String>,
        player_2: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            player_1: player_1.into(),
            player_2: player_2.into(),
            wins: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            created_at: Utc::now(),
        }
    }

    /// Current stats as a separate struct (for API responses).
    pub fn stats(&self) -> TeamStats {
        TeamStats::from_team(self)
    }

    /// The record after one more decisive game, or `None` if a counter would overflow.
    pub fn record_after(&self, won: bool, scored: u32, conceded: u32) -> Option<Record> {
        let (wins, losses) = if won {
            (self.wins.checked_add(1)?, self.losses)
        } else {
            (self.wins, self.losses.checked_add(1)?)
        };
        Some(Record {
            wins,
            losses,
            goals_for: self.goals_for.checked_add(scored)?,
            goals_against: self.goals_against.checked_add(conceded)?,
        })
    }

    pub fn set_record(&mut self, record: Record) {
        self.wins = record.wins;
        self.losses = record.losses;
        self.goals_for = record.goals_for;
        self.goals_against = record.goals_against;
    }

    /// Decisive games played (ties are not counted).
    pub fn games_played(&self) -> u32 {
        self.wins.saturating_add(self.losses)
    }

    /// Wins as a percentage of decisive games, 0 when none were played.
    pub fn win_percentage(&self) -> f64 {
        let total = self.games_played();
        if total == 0 {
            return 0.0;
        }
        f64::from(self.wins) / f64::from(total) * 100.0
    }

    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }

    /// Both player names, in slot order.
    pub fn players(&self) -> [&str; 2] {
        [self.player_1.as_str(), self.player_2.as_str()]
    }
}
