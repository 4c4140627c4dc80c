//! Store traits consumed by the rating engine, the monitor and the service

use crate::error::Result;
use crate::types::{
    Match, MatchId, Player, PlayerId, PlayerMatchChampion, RatingHistoryEntry, Season, TeamSide,
};
use std::collections::HashMap;

/// Trait for player storage operations
pub trait PlayerStore: Send + Sync {
    /// Get a player by id
    fn get_player(&self, player_id: PlayerId) -> Result<Option<Player>>;

    /// Get the player linked to an external account
    fn get_player_by_account(&self, account_id: &str) -> Result<Option<Player>>;

    /// Get several players at once; missing ids are simply absent from the map
    fn get_players(&self, player_ids: &[PlayerId]) -> Result<HashMap<PlayerId, Player>>;

    /// Insert or replace a player
    fn save_player(&self, player: Player) -> Result<()>;

    /// All registered players
    fn list_players(&self) -> Result<Vec<Player>>;
}

/// Trait for match storage operations
pub trait MatchStore: Send + Sync {
    fn get_match(&self, match_id: MatchId) -> Result<Option<Match>>;

    /// Store a freshly formed match
    fn create_match(&self, game: Match) -> Result<()>;

    fn list_matches(&self) -> Result<Vec<Match>>;
}

/// Trait for the append-only rating ledger
pub trait RatingHistoryStore: Send + Sync {
    fn append_entry(&self, entry: RatingHistoryEntry) -> Result<()>;

    /// Ledger entries of one match in append order
    fn entries_for_match(&self, match_id: MatchId) -> Result<Vec<RatingHistoryEntry>>;

    /// Ledger entries of one player in append order
    fn entries_for_player(&self, player_id: PlayerId) -> Result<Vec<RatingHistoryEntry>>;
}

/// Trait for confirmed champion picks
pub trait ChampionPickStore: Send + Sync {
    fn create_pick(&self, pick: PlayerMatchChampion) -> Result<()>;

    fn picks_for_match(&self, match_id: MatchId) -> Result<Vec<PlayerMatchChampion>>;
}

/// Trait for season bookkeeping
pub trait SeasonStore: Send + Sync {
    /// The most recently started season
    fn current_season(&self) -> Result<Option<Season>>;

    fn list_seasons(&self) -> Result<Vec<Season>>;
}

/// A change to one field of a stored match.
///
/// Each change carries its precondition, checked against the stored match when
/// the batch is applied, so a caller working from an outdated copy cannot
/// resolve a match twice or register its champions twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchChange {
    /// Record the winner; the stored match must have no result
    Resolve { winner: TeamSide },
    /// Clear the result; the stored match must have one
    Reopen,
    /// Set `champions_registered`; the stored match must not have it set
    MarkChampionsRegistered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchUpdate {
    pub match_id: MatchId,
    pub change: MatchChange,
}

impl MatchUpdate {
    pub fn new(match_id: MatchId, change: MatchChange) -> Self {
        Self { match_id, change }
    }
}

/// A set of changes that must be persisted together or not at all
#[derive(Debug, Clone, Default)]
pub struct CommitBatch {
    /// Players to insert or replace
    pub players: Vec<Player>,
    /// Field-level changes to existing matches
    pub match_updates: Vec<MatchUpdate>,
    /// Ledger entries to append
    pub new_entries: Vec<RatingHistoryEntry>,
    /// Existing ledger entries to replace (only `reverted` may change)
    pub updated_entries: Vec<RatingHistoryEntry>,
    /// Champion picks to insert
    pub champion_picks: Vec<PlayerMatchChampion>,
    /// Season to open; the current one is closed at its start date
    pub start_season: Option<Season>,
}

impl CommitBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
            && self.match_updates.is_empty()
            && self.new_entries.is_empty()
            && self.updated_entries.is_empty()
            && self.champion_picks.is_empty()
            && self.start_season.is_none()
    }
}

/// Complete store the core runs against
pub trait GameStore:
    PlayerStore + MatchStore + RatingHistoryStore + ChampionPickStore + SeasonStore
{
    /// Apply every change in `batch` as one unit.
    ///
    /// Implementations must validate the whole batch, including every
    /// [`MatchChange`] precondition, under the same exclusive section that
    /// applies it. A failed check leaves the store untouched and surfaces as
    /// `AlreadyFinalized`, `NotFinalized` or `ChampionsAlreadyRegistered`.
    fn commit(&self, batch: CommitBatch) -> Result<()>;
}
