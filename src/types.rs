//! Common types used throughout the game-night core

use crate::error::{GameNightError, Result};
use crate::utils::{current_timestamp, generate_match_id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Unique identifier for registered players
pub type PlayerId = u64;

/// Unique identifier for matches
pub type MatchId = Uuid;

/// Unique identifier for rating ledger entries
pub type EntryId = Uuid;

/// Sequential identifier for seasons
pub type SeasonId = u32;

/// Champion identifier as published by the champion data service
pub type ChampionId = String;

/// Identifier linking a player to the external live-game service
pub type AccountId = String;

/// Points every player starts with
pub const DEFAULT_POINTS: i64 = 1500;

/// Smallest and largest supported team size
pub const MIN_MATCH_MODE: usize = 1;
pub const MAX_MATCH_MODE: usize = 5;

/// A registered player.
///
/// Two players are equal when their ids are equal; name, account and points
/// are data, not identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub account_id: Option<AccountId>,
    pub points: i64,
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Create a player with the default starting points
    pub fn new(id: PlayerId, name: impl Into<String>, account_id: Option<AccountId>) -> Self {
        Self {
            id,
            name: name.into(),
            account_id,
            points: DEFAULT_POINTS,
            created_at: current_timestamp(),
        }
    }

    /// Builder-style override of the starting points
    pub fn with_points(mut self, points: i64) -> Self {
        self.points = points;
        self
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Side of the map a team plays on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    Blue,
    Red,
}

impl TeamSide {
    pub fn opposite(self) -> Self {
        match self {
            TeamSide::Blue => TeamSide::Red,
            TeamSide::Red => TeamSide::Blue,
        }
    }
}

impl std::fmt::Display for TeamSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamSide::Blue => write!(f, "blue"),
            TeamSide::Red => write!(f, "red"),
        }
    }
}

/// One side of a match as formed by the balancer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub side: TeamSide,
    /// Roster in formation order
    pub players: Vec<PlayerId>,
    /// Champion draft offered to this team
    pub champions: Vec<ChampionId>,
    /// Mean roster points at formation time
    pub team_rating: f64,
}

/// A played (or playing) match between two teams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub created_at: DateTime<Utc>,
    /// Team size, 1 to 5
    pub mode: usize,
    pub season_id: Option<SeasonId>,
    pub blue: Team,
    pub red: Team,
    pub result: Option<TeamSide>,
    pub champions_registered: bool,
}

impl Match {
    /// Build an unresolved match from a blue and a red team
    pub fn new(blue: Team, red: Team, season_id: Option<SeasonId>) -> Result<Self> {
        if blue.side != TeamSide::Blue || red.side != TeamSide::Red {
            return Err(GameNightError::InternalError {
                message: format!(
                    "Teams must be given as (blue, red), got ({}, {})",
                    blue.side, red.side
                ),
            }
            .into());
        }

        let mode = blue.players.len();
        if red.players.len() != mode || !(MIN_MATCH_MODE..=MAX_MATCH_MODE).contains(&mode) {
            return Err(GameNightError::InvalidMatchMode {
                mode: mode.max(red.players.len()),
            }
            .into());
        }

        let mut seen = HashSet::with_capacity(mode * 2);
        if let Some(player_id) = blue
            .players
            .iter()
            .chain(red.players.iter())
            .find(|id| !seen.insert(**id))
        {
            return Err(GameNightError::DuplicatePlayer {
                player_id: *player_id,
            }
            .into());
        }

        Ok(Self {
            id: generate_match_id(),
            created_at: current_timestamp(),
            mode,
            season_id,
            blue,
            red,
            result: None,
            champions_registered: false,
        })
    }

    /// Get the team playing on the given side
    pub fn team(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::Blue => &self.blue,
            TeamSide::Red => &self.red,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.result.is_some()
    }

    /// All player ids across both teams, blue first
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.blue
            .players
            .iter()
            .chain(self.red.players.iter())
            .copied()
    }

    /// Side the given player played on, if any
    pub fn side_of(&self, player_id: PlayerId) -> Option<TeamSide> {
        if self.blue.players.contains(&player_id) {
            Some(TeamSide::Blue)
        } else if self.red.players.contains(&player_id) {
            Some(TeamSide::Red)
        } else {
            None
        }
    }
}

/// Append-only record of one rating change.
///
/// `match_id` is `None` for season resets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingHistoryEntry {
    pub id: EntryId,
    pub player_id: PlayerId,
    pub match_id: Option<MatchId>,
    pub points_before: i64,
    pub points_after: i64,
    pub delta: i64,
    pub reverted: bool,
    pub created_at: DateTime<Utc>,
}

impl RatingHistoryEntry {
    pub fn new(
        player_id: PlayerId,
        match_id: Option<MatchId>,
        points_before: i64,
        points_after: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_id,
            match_id,
            points_before,
            points_after,
            delta: points_after - points_before,
            reverted: false,
            created_at: current_timestamp(),
        }
    }
}

/// Champion a player was confirmed to play in a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMatchChampion {
    pub id: Uuid,
    pub player_id: PlayerId,
    pub match_id: MatchId,
    pub champion_id: ChampionId,
    pub created_at: DateTime<Utc>,
}

impl PlayerMatchChampion {
    pub fn new(player_id: PlayerId, match_id: MatchId, champion_id: ChampionId) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_id,
            match_id,
            champion_id,
            created_at: current_timestamp(),
        }
    }
}

/// Ranking period boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: SeasonId,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Entry of the champion catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Champion {
    pub id: ChampionId,
    pub name: String,
}

impl Champion {
    pub fn new(id: impl Into<ChampionId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
