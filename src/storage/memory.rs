//! In-memory game store
//!
//! Records live in id-indexed maps; the ledger and the champion picks are
//! append-only arenas with an id → slot index. One lock guards everything so a
//! [`CommitBatch`] is applied as a single unit.

use crate::error::{GameNightError, Result};
use crate::storage::stores::{
    ChampionPickStore, CommitBatch, GameStore, MatchChange, MatchStore, MatchUpdate, PlayerStore,
    RatingHistoryStore, SeasonStore,
};
use crate::types::{
    AccountId, EntryId, Match, MatchId, Player, PlayerId, PlayerMatchChampion,
    RatingHistoryEntry, Season,
};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

#[derive(Debug, Default)]
struct StoreState {
    players: HashMap<PlayerId, Player>,
    account_index: HashMap<AccountId, PlayerId>,
    matches: HashMap<MatchId, Match>,
    entries: Vec<RatingHistoryEntry>,
    entry_index: HashMap<EntryId, usize>,
    picks: Vec<PlayerMatchChampion>,
    seasons: Vec<Season>,
}

impl StoreState {
    fn put_player(&mut self, player: Player) {
        if let Some(previous) = self.players.get(&player.id) {
            if let Some(old_account) = &previous.account_id {
                if player.account_id.as_ref() != Some(old_account) {
                    self.account_index.remove(old_account);
                }
            }
        }
        if let Some(account_id) = &player.account_id {
            self.account_index.insert(account_id.clone(), player.id);
        }
        self.players.insert(player.id, player);
    }

    fn push_entry(&mut self, entry: RatingHistoryEntry) {
        self.entry_index.insert(entry.id, self.entries.len());
        self.entries.push(entry);
    }

    fn check_match_update(&self, update: &MatchUpdate) -> Result<()> {
        let match_id = update.match_id;
        let game = self
            .matches
            .get(&match_id)
            .ok_or(GameNightError::MatchNotFound { match_id })?;

        let conflict = match update.change {
            MatchChange::Resolve { .. } if game.result.is_some() => {
                Some(GameNightError::AlreadyFinalized { match_id })
            }
            MatchChange::Reopen if game.result.is_none() => {
                Some(GameNightError::NotFinalized { match_id })
            }
            MatchChange::MarkChampionsRegistered if game.champions_registered => {
                Some(GameNightError::ChampionsAlreadyRegistered { match_id })
            }
            _ => None,
        };

        match conflict {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    fn apply_match_update(&mut self, update: MatchUpdate) {
        if let Some(game) = self.matches.get_mut(&update.match_id) {
            match update.change {
                MatchChange::Resolve { winner } => game.result = Some(winner),
                MatchChange::Reopen => game.result = None,
                MatchChange::MarkChampionsRegistered => game.champions_registered = true,
            }
        }
    }

    fn open_season(&mut self, season: Season) {
        if let Some(current) = self.seasons.last_mut() {
            if current.end_date.is_none() {
                current.end_date = Some(season.start_date);
            }
        }
        self.seasons.push(season);
    }
}

/// In-memory implementation of every store trait
#[derive(Debug, Default)]
pub struct InMemoryGameStore {
    state: RwLock<StoreState>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with one open season, as a fresh deployment starts
    pub fn with_initial_season(season: Season) -> Self {
        let store = Self::new();
        if let Ok(mut state) = store.state.write() {
            state.open_season(season);
        }
        store
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|_| GameNightError::lock_poisoned("store read").into())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| GameNightError::lock_poisoned("store write").into())
    }
}

impl PlayerStore for InMemoryGameStore {
    fn get_player(&self, player_id: PlayerId) -> Result<Option<Player>> {
        Ok(self.read()?.players.get(&player_id).cloned())
    }

    fn get_player_by_account(&self, account_id: &str) -> Result<Option<Player>> {
        let state = self.read()?;
        Ok(state
            .account_index
            .get(account_id)
            .and_then(|id| state.players.get(id))
            .cloned())
    }

    fn get_players(&self, player_ids: &[PlayerId]) -> Result<HashMap<PlayerId, Player>> {
        let state = self.read()?;

        let mut result = HashMap::new();
        for player_id in player_ids {
            if let Some(player) = state.players.get(player_id) {
                result.insert(*player_id, player.clone());
            }
        }

        Ok(result)
    }

    fn save_player(&self, player: Player) -> Result<()> {
        self.write()?.put_player(player);
        Ok(())
    }

    fn list_players(&self) -> Result<Vec<Player>> {
        let mut players: Vec<Player> = self.read()?.players.values().cloned().collect();
        players.sort_by_key(|p| p.id);
        Ok(players)
    }
}

impl MatchStore for InMemoryGameStore {
    fn get_match(&self, match_id: MatchId) -> Result<Option<Match>> {
        Ok(self.read()?.matches.get(&match_id).cloned())
    }

    fn create_match(&self, game: Match) -> Result<()> {
        let mut state = self.write()?;
        if state.matches.contains_key(&game.id) {
            return Err(GameNightError::InternalError {
                message: format!("Match {} already exists", game.id),
            }
            .into());
        }
        state.matches.insert(game.id, game);
        Ok(())
    }

    fn list_matches(&self) -> Result<Vec<Match>> {
        let mut matches: Vec<Match> = self.read()?.matches.values().cloned().collect();
        matches.sort_by_key(|m| m.created_at);
        Ok(matches)
    }
}

impl RatingHistoryStore for InMemoryGameStore {
    fn append_entry(&self, entry: RatingHistoryEntry) -> Result<()> {
        self.write()?.push_entry(entry);
        Ok(())
    }

    fn entries_for_match(&self, match_id: MatchId) -> Result<Vec<RatingHistoryEntry>> {
        Ok(self
            .read()?
            .entries
            .iter()
            .filter(|e| e.match_id == Some(match_id))
            .cloned()
            .collect())
    }

    fn entries_for_player(&self, player_id: PlayerId) -> Result<Vec<RatingHistoryEntry>> {
        Ok(self
            .read()?
            .entries
            .iter()
            .filter(|e| e.player_id == player_id)
            .cloned()
            .collect())
    }
}

impl ChampionPickStore for InMemoryGameStore {
    fn create_pick(&self, pick: PlayerMatchChampion) -> Result<()> {
        self.write()?.picks.push(pick);
        Ok(())
    }

    fn picks_for_match(&self, match_id: MatchId) -> Result<Vec<PlayerMatchChampion>> {
        Ok(self
            .read()?
            .picks
            .iter()
            .filter(|p| p.match_id == match_id)
            .cloned()
            .collect())
    }
}

impl SeasonStore for InMemoryGameStore {
    fn current_season(&self) -> Result<Option<Season>> {
        Ok(self.read()?.seasons.last().cloned())
    }

    fn list_seasons(&self) -> Result<Vec<Season>> {
        Ok(self.read()?.seasons.clone())
    }
}

impl GameStore for InMemoryGameStore {
    fn commit(&self, batch: CommitBatch) -> Result<()> {
        let mut state = self.write()?;

        // Validate first so a bad batch leaves the store untouched
        for update in &batch.match_updates {
            state.check_match_update(update)?;
        }
        for (i, update) in batch.match_updates.iter().enumerate() {
            if batch.match_updates[..i].contains(update) {
                return Err(GameNightError::InternalError {
                    message: format!("Match {} updated twice in one batch", update.match_id),
                }
                .into());
            }
        }
        for entry in &batch.updated_entries {
            if !state.entry_index.contains_key(&entry.id) {
                return Err(GameNightError::InternalError {
                    message: format!("Ledger entry {} does not exist", entry.id),
                }
                .into());
            }
        }

        debug!(
            "Committing batch - players: {}, match updates: {}, new entries: {}, updated entries: {}, picks: {}",
            batch.players.len(),
            batch.match_updates.len(),
            batch.new_entries.len(),
            batch.updated_entries.len(),
            batch.champion_picks.len()
        );

        for player in batch.players {
            state.put_player(player);
        }
        for update in batch.match_updates {
            state.apply_match_update(update);
        }
        for entry in batch.new_entries {
            state.push_entry(entry);
        }
        for entry in batch.updated_entries {
            let slot = state.entry_index.get(&entry.id).copied();
            if let Some(slot) = slot {
                state.entries[slot] = entry;
            }
        }
        state.picks.extend(batch.champion_picks);
        if let Some(season) = batch.start_season {
            state.open_season(season);
        }

        Ok(())
    }
}
