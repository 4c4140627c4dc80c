//! Rating engine: finalize / revert / champion registration / season reset
//!
//! Per match the ledger moves `Open -> Resolved -> Open (revert) -> Resolved ...`.
//! Every operation reads the stored state it needs, builds one [`CommitBatch`]
//! and hands it to the store, so nothing is half-applied when the store rejects
//! a change. Writes are serialized by the engine so points read before a
//! commit are still current when the commit lands.

use crate::config::RatingConfig;
use crate::error::{GameNightError, Result};
use crate::rating::elo::point_change;
use crate::rating::stats::{compute_player_stats, PlayerStats};
use crate::riot::types::ActiveGame;
use crate::storage::{
    CommitBatch, GameStore, MatchChange, MatchStore, MatchUpdate, PlayerStore,
    RatingHistoryStore, SeasonStore,
};
use crate::types::{
    AccountId, ChampionId, Match, MatchId, Player, PlayerId, PlayerMatchChampion,
    RatingHistoryEntry, Season, TeamSide,
};
use crate::utils::current_timestamp;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Result of a successful finalize
#[derive(Debug, Clone)]
pub struct RatingOutcome {
    pub match_id: MatchId,
    pub winner: TeamSide,
    /// Points each winner gained and each loser lost
    pub point_change: i64,
    /// Ledger entries written, winners first
    pub entries: Vec<RatingHistoryEntry>,
}

/// Result of a successful revert
#[derive(Debug, Clone)]
pub struct RevertOutcome {
    pub match_id: MatchId,
    /// Entries flipped to `reverted` by this call
    pub reverted_entries: usize,
    /// Entries left alone because their player no longer exists
    pub skipped_entries: usize,
}

/// Result of binding live champion picks to a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChampionRegistration {
    Registered { picks: usize },
    AlreadyRegistered,
}

/// Applies and reverses rating changes against a [`GameStore`]
pub struct RatingEngine {
    store: Arc<dyn GameStore>,
    config: RatingConfig,
    write_lock: Mutex<()>,
}

impl RatingEngine {
    pub fn new(store: Arc<dyn GameStore>, config: RatingConfig) -> Self {
        Self {
            store,
            config,
            write_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Register a player, or update the name and account of a known one.
    ///
    /// New players start at the default points; known players keep theirs.
    pub fn register_player(
        &self,
        player_id: PlayerId,
        name: &str,
        account_id: Option<AccountId>,
    ) -> Result<Player> {
        let _guard = self.lock_writes()?;

        let player = match self.store.get_player(player_id)? {
            Some(mut existing) => {
                existing.name = name.to_string();
                existing.account_id = account_id;
                existing
            }
            None => {
                info!("Registering new player {} ({})", name, player_id);
                Player::new(player_id, name, account_id).with_points(self.config.default_points)
            }
        };

        self.store.save_player(player.clone())?;
        Ok(player)
    }

    /// Record `winning_side` as the result of the stored match and move points.
    ///
    /// Fails with `AlreadyFinalized` without touching anything if the match
    /// already has a result.
    pub fn finalize(&self, match_id: MatchId, winning_side: TeamSide) -> Result<RatingOutcome> {
        let _guard = self.lock_writes()?;
        let game = self.load_match(match_id)?;

        if game.result.is_some() {
            return Err(GameNightError::AlreadyFinalized { match_id }.into());
        }

        let winning = game.team(winning_side);
        let losing = game.team(winning_side.opposite());

        let k_factor = self.config.k_factor(game.mode);
        let change = point_change(k_factor, winning.team_rating, losing.team_rating);

        let player_ids: Vec<PlayerId> = game.player_ids().collect();
        let mut players = self.load_players(&player_ids)?;

        let mut entries = Vec::with_capacity(player_ids.len());
        let mut updated_players = Vec::with_capacity(player_ids.len());

        for (team, delta) in [(winning, change), (losing, -change)] {
            for player_id in &team.players {
                let player = players
                    .get_mut(player_id)
                    .ok_or(GameNightError::PlayerNotFound {
                        player_id: *player_id,
                    })?;

                let points_before = player.points;
                player.points += delta;

                entries.push(RatingHistoryEntry::new(
                    *player_id,
                    Some(match_id),
                    points_before,
                    player.points,
                ));
                updated_players.push(player.clone());
            }
        }

        self.store.commit(CommitBatch {
            players: updated_players,
            match_updates: vec![MatchUpdate::new(
                match_id,
                MatchChange::Resolve {
                    winner: winning_side,
                },
            )],
            new_entries: entries.clone(),
            ..CommitBatch::new()
        })?;

        info!(
            "Match {} finished. Winner: {}. Elo change: +/- {} points (K={}).",
            match_id, winning_side, change, k_factor
        );

        Ok(RatingOutcome {
            match_id,
            winner: winning_side,
            point_change: change,
            entries,
        })
    }

    /// Undo the points of every not-yet-reverted ledger entry of the match and
    /// clear its result.
    ///
    /// Deltas are subtracted from the players' current points rather than
    /// restoring `points_before`, so later changes survive the revert.
    pub fn revert(&self, match_id: MatchId) -> Result<RevertOutcome> {
        let _guard = self.lock_writes()?;
        let game = self.load_match(match_id)?;

        if game.result.is_none() {
            return Err(GameNightError::NotFinalized { match_id }.into());
        }

        let pending: Vec<RatingHistoryEntry> = self
            .store
            .entries_for_match(match_id)?
            .into_iter()
            .filter(|entry| !entry.reverted)
            .collect();

        let player_ids: Vec<PlayerId> = pending.iter().map(|e| e.player_id).collect();
        let mut players = self.store.get_players(&player_ids)?;

        let mut reverted_entries = Vec::with_capacity(pending.len());
        let mut skipped_entries = 0;

        for mut entry in pending {
            match players.get_mut(&entry.player_id) {
                Some(player) => {
                    info!(
                        "Revert {}: {} -> {}",
                        player.name,
                        player.points,
                        player.points - entry.delta
                    );
                    player.points -= entry.delta;
                    entry.reverted = true;
                    reverted_entries.push(entry);
                }
                None => {
                    warn!(
                        "Skipping ledger entry {} of match {}: player {} no longer exists",
                        entry.id, match_id, entry.player_id
                    );
                    skipped_entries += 1;
                }
            }
        }

        let reverted_count = reverted_entries.len();
        self.store.commit(CommitBatch {
            players: players.into_values().collect(),
            match_updates: vec![MatchUpdate::new(match_id, MatchChange::Reopen)],
            updated_entries: reverted_entries,
            ..CommitBatch::new()
        })?;

        info!("Match {} reverted ({} ledger entries).", match_id, reverted_count);

        Ok(RevertOutcome {
            match_id,
            reverted_entries: reverted_count,
            skipped_entries,
        })
    }

    /// Bind the champions each tracked player is playing in `live_game` to the
    /// match. Runs at most once per match.
    pub fn register_match_champions(
        &self,
        match_id: MatchId,
        live_game: &ActiveGame,
    ) -> Result<ChampionRegistration> {
        let _guard = self.lock_writes()?;
        let game = self.load_match(match_id)?;

        if game.champions_registered {
            debug!("Champions of match {} already registered", match_id);
            return Ok(ChampionRegistration::AlreadyRegistered);
        }

        let champion_by_account: HashMap<&str, &ChampionId> = live_game
            .participants
            .iter()
            .map(|p| (p.account_id.as_str(), &p.champion_id))
            .collect();

        let player_ids: Vec<PlayerId> = game.player_ids().collect();
        let players = self.store.get_players(&player_ids)?;

        let picks: Vec<PlayerMatchChampion> = player_ids
            .iter()
            .filter_map(|id| players.get(id))
            .filter_map(|player| {
                let account_id = player.account_id.as_deref()?;
                let champion_id = champion_by_account.get(account_id)?;
                Some(PlayerMatchChampion::new(
                    player.id,
                    match_id,
                    (*champion_id).clone(),
                ))
            })
            .collect();

        let pick_count = picks.len();
        let committed = self.store.commit(CommitBatch {
            match_updates: vec![MatchUpdate::new(
                match_id,
                MatchChange::MarkChampionsRegistered,
            )],
            champion_picks: picks,
            ..CommitBatch::new()
        });

        if let Err(e) = committed {
            let raced = matches!(
                e.downcast_ref::<GameNightError>(),
                Some(GameNightError::ChampionsAlreadyRegistered { .. })
            );
            if !raced {
                return Err(e);
            }
            debug!("Champions of match {} registered concurrently", match_id);
            return Ok(ChampionRegistration::AlreadyRegistered);
        }

        info!(
            "Registered {} champion picks for match {} (live game {})",
            pick_count, match_id, live_game.game_id
        );

        Ok(ChampionRegistration::Registered { picks: pick_count })
    }

    /// Start a new season: every player goes back to the default points, each
    /// reset recorded as a ledger entry without a match.
    pub fn reset_season(&self) -> Result<Season> {
        let _guard = self.lock_writes()?;
        let players = self.store.list_players()?;
        let next_id = self
            .store
            .current_season()?
            .map(|season| season.id + 1)
            .unwrap_or(1);

        let default_points = self.config.default_points;
        let mut entries = Vec::with_capacity(players.len());
        let mut reset_players = Vec::with_capacity(players.len());

        for mut player in players {
            let points_before = player.points;
            player.points = default_points;
            entries.push(RatingHistoryEntry::new(
                player.id,
                None,
                points_before,
                default_points,
            ));
            reset_players.push(player);
        }

        let season = Season {
            id: next_id,
            start_date: current_timestamp(),
            end_date: None,
        };

        let player_count = reset_players.len();
        self.store.commit(CommitBatch {
            players: reset_players,
            new_entries: entries,
            start_season: Some(season.clone()),
            ..CommitBatch::new()
        })?;

        info!(
            "Season {} started; {} players reset to {} points",
            season.id, player_count, default_points
        );

        Ok(season)
    }

    /// Players with at least one ledger entry, highest points first
    pub fn leaderboard(&self) -> Result<Vec<Player>> {
        let mut ranked = Vec::new();
        for player in self.store.list_players()? {
            if !self.store.entries_for_player(player.id)?.is_empty() {
                ranked.push(player);
            }
        }
        ranked.sort_by(|a, b| b.points.cmp(&a.points).then(a.id.cmp(&b.id)));
        Ok(ranked)
    }

    /// Win/loss statistics over every resolved match
    pub fn player_stats(&self) -> Result<Vec<PlayerStats>> {
        let matches = self.store.list_matches()?;
        let mut stats: Vec<PlayerStats> = compute_player_stats(&matches).into_values().collect();
        stats.sort_by_key(|s| s.player_id);
        Ok(stats)
    }

    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| GameNightError::lock_poisoned("rating engine").into())
    }

    fn load_match(&self, match_id: MatchId) -> Result<Match> {
        self.store
            .get_match(match_id)?
            .ok_or_else(|| GameNightError::MatchNotFound { match_id }.into())
    }

    fn load_players(&self, player_ids: &[PlayerId]) -> Result<HashMap<PlayerId, Player>> {
        let players = self.store.get_players(player_ids)?;
        if let Some(missing) = player_ids.iter().find(|id| !players.contains_key(id)) {
            return Err(GameNightError::PlayerNotFound {
                player_id: *missing,
            }
            .into());
        }
        Ok(players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::riot::types::LiveParticipant;
    use crate::storage::{ChampionPickStore, InMemoryGameStore};
    use crate::types::Team;

    struct Fixture {
        store: Arc<InMemoryGameStore>,
        engine: RatingEngine,
    }

    fn create_fixture(players: Vec<Player>) -> Fixture {
        let store = Arc::new(InMemoryGameStore::new());
        for player in players {
            store.save_player(player).unwrap();
        }
        let engine = RatingEngine::new(store.clone(), RatingConfig::default());
        Fixture { store, engine }
    }

    fn create_test_match(store: &InMemoryGameStore, blue: Vec<PlayerId>, red: Vec<PlayerId>) -> Match {
        let rating = |ids: &[PlayerId]| {
            let players = store.get_players(ids).unwrap();
            ids.iter().map(|id| players[id].points as f64).sum::<f64>() / ids.len() as f64
        };
        let game = Match::new(
            Team {
                side: TeamSide::Blue,
                team_rating: rating(&blue),
                players: blue,
                champions: vec![],
            },
            Team {
                side: TeamSide::Red,
                team_rating: rating(&red),
                players: red,
                champions: vec![],
            },
            None,
        )
        .unwrap();
        store.create_match(game.clone()).unwrap();
        game
    }

    fn five_v_five() -> Vec<Player> {
        (1..=10)
            .map(|i| Player::new(i, format!("player{}", i), Some(format!("acc-{}", i))))
            .collect()
    }

    fn points(store: &InMemoryGameStore, id: PlayerId) -> i64 {
        store.get_player(id).unwrap().unwrap().points
    }

    #[test]
    fn test_finalize_equal_teams_mode_five() {
        let fx = create_fixture(five_v_five());
        let game = create_test_match(&fx.store, (1..=5).collect(), (6..=10).collect());

        let outcome = fx.engine.finalize(game.id, TeamSide::Blue).unwrap();

        assert_eq!(outcome.point_change, 10);
        assert_eq!(outcome.entries.len(), 10);
        for id in 1..=5 {
            assert_eq!(points(&fx.store, id), 1510);
        }
        for id in 6..=10 {
            assert_eq!(points(&fx.store, id), 1490);
        }

        let stored = fx.store.get_match(game.id).unwrap().unwrap();
        assert_eq!(stored.result, Some(TeamSide::Blue));

        let ledger = fx.store.entries_for_match(game.id).unwrap();
        assert_eq!(ledger.len(), 10);
        assert!(ledger.iter().all(|e| !e.reverted));
        assert_eq!(ledger.iter().map(|e| e.delta).sum::<i64>(), 0);
    }

    #[test]
    fn test_every_teammate_gets_identical_delta() {
        let players = vec![
            Player::new(1, "a", None).with_points(1200),
            Player::new(2, "b", None).with_points(1800),
            Player::new(3, "c", None).with_points(1500),
            Player::new(4, "d", None).with_points(1500),
        ];
        let fx = create_fixture(players);
        let game = create_test_match(&fx.store, vec![1, 2], vec![3, 4]);

        let outcome = fx.engine.finalize(game.id, TeamSide::Red).unwrap();

        // Mode 2 -> K=1
        assert_eq!(outcome.point_change, 1);
        assert_eq!(points(&fx.store, 1), 1199);
        assert_eq!(points(&fx.store, 2), 1799);
        assert_eq!(points(&fx.store, 3), 1501);
        assert_eq!(points(&fx.store, 4), 1501);
    }

    #[test]
    fn test_finalize_twice_is_rejected() {
        let fx = create_fixture(five_v_five());
        let game = create_test_match(&fx.store, (1..=5).collect(), (6..=10).collect());
        fx.engine.finalize(game.id, TeamSide::Blue).unwrap();

        let err = fx.engine.finalize(game.id, TeamSide::Red).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GameNightError>(),
            Some(GameNightError::AlreadyFinalized { .. })
        ));

        assert_eq!(fx.store.entries_for_match(game.id).unwrap().len(), 10);
        assert_eq!(
            fx.store.get_match(game.id).unwrap().unwrap().result,
            Some(TeamSide::Blue)
        );
        assert_eq!(points(&fx.store, 1), 1510);
    }

    #[test]
    fn test_finalize_with_missing_player_changes_nothing() {
        let fx = create_fixture(vec![Player::new(1, "a", None)]);
        let game = Match::new(
            Team {
                side: TeamSide::Blue,
                players: vec![1],
                champions: vec![],
                team_rating: 1500.0,
            },
            Team {
                side: TeamSide::Red,
                players: vec![2],
                champions: vec![],
                team_rating: 1500.0,
            },
            None,
        )
        .unwrap();
        fx.store.create_match(game.clone()).unwrap();

        let err = fx.engine.finalize(game.id, TeamSide::Blue).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GameNightError>(),
            Some(GameNightError::PlayerNotFound { player_id: 2 })
        ));
        assert!(fx.store.get_match(game.id).unwrap().unwrap().result.is_none());
        assert_eq!(points(&fx.store, 1), 1500);
        assert!(fx.store.entries_for_match(game.id).unwrap().is_empty());
    }

    #[test]
    fn test_revert_restores_points_and_marks_entries() {
        let fx = create_fixture(five_v_five());
        let game = create_test_match(&fx.store, (1..=5).collect(), (6..=10).collect());
        fx.engine.finalize(game.id, TeamSide::Red).unwrap();

        let outcome = fx.engine.revert(game.id).unwrap();

        assert_eq!(outcome.reverted_entries, 10);
        assert_eq!(outcome.skipped_entries, 0);
        assert!(fx.store.get_match(game.id).unwrap().unwrap().result.is_none());
        for id in 1..=10 {
            assert_eq!(points(&fx.store, id), 1500);
        }
        assert!(fx
            .store
            .entries_for_match(game.id)
            .unwrap()
            .iter()
            .all(|e| e.reverted));
    }

    #[test]
    fn test_revert_subtracts_from_current_points() {
        let fx = create_fixture(five_v_five());
        let game = create_test_match(&fx.store, (1..=5).collect(), (6..=10).collect());
        fx.engine.finalize(game.id, TeamSide::Blue).unwrap();

        // Player 1 moves on elsewhere before the revert
        let mut p1 = fx.store.get_player(1).unwrap().unwrap();
        p1.points += 37;
        fx.store.save_player(p1).unwrap();

        fx.engine.revert(game.id).unwrap();

        assert_eq!(points(&fx.store, 1), 1537);
        assert_eq!(points(&fx.store, 2), 1500);
    }

    #[test]
    fn test_revert_unresolved_match_is_rejected() {
        let fx = create_fixture(five_v_five());
        let game = create_test_match(&fx.store, (1..=5).collect(), (6..=10).collect());

        let err = fx.engine.revert(game.id).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GameNightError>(),
            Some(GameNightError::NotFinalized { .. })
        ));
    }

    #[test]
    fn test_revert_then_finalize_writes_fresh_entries() {
        let fx = create_fixture(five_v_five());
        let game = create_test_match(&fx.store, (1..=5).collect(), (6..=10).collect());

        let first = fx.engine.finalize(game.id, TeamSide::Blue).unwrap();
        fx.engine.revert(game.id).unwrap();
        let second = fx.engine.finalize(game.id, TeamSide::Red).unwrap();

        let first_ids: Vec<_> = first.entries.iter().map(|e| e.id).collect();
        assert!(second.entries.iter().all(|e| !first_ids.contains(&e.id)));

        let ledger = fx.store.entries_for_match(game.id).unwrap();
        assert_eq!(ledger.len(), 20);
        assert_eq!(ledger.iter().filter(|e| e.reverted).count(), 10);
        assert!(ledger
            .iter()
            .filter(|e| first_ids.contains(&e.id))
            .all(|e| e.reverted));

        assert_eq!(points(&fx.store, 1), 1490);
        assert_eq!(points(&fx.store, 6), 1510);

        // A second revert only touches the live entries
        let outcome = fx.engine.revert(game.id).unwrap();
        assert_eq!(outcome.reverted_entries, 10);
        assert_eq!(points(&fx.store, 1), 1500);
    }

    #[test]
    fn test_register_champions_once() {
        let mut players = five_v_five();
        players[9].account_id = None;
        let fx = create_fixture(players);
        let game = create_test_match(&fx.store, (1..=5).collect(), (6..=10).collect());

        let live = ActiveGame {
            game_id: 77,
            participants: (1..=10)
                .map(|i| LiveParticipant {
                    account_id: format!("acc-{}", i),
                    champion_id: (100 + i).to_string(),
                })
                .chain(std::iter::once(LiveParticipant {
                    account_id: "stranger".to_string(),
                    champion_id: "1".to_string(),
                }))
                .collect(),
        };

        let first = fx.engine.register_match_champions(game.id, &live).unwrap();
        assert_eq!(first, ChampionRegistration::Registered { picks: 9 });

        let second = fx.engine.register_match_champions(game.id, &live).unwrap();
        assert_eq!(second, ChampionRegistration::AlreadyRegistered);

        let picks = fx.store.picks_for_match(game.id).unwrap();
        assert_eq!(picks.len(), 9);
        assert!(picks
            .iter()
            .any(|p| p.player_id == 3 && p.champion_id == "103"));
        assert!(fx.store.get_match(game.id).unwrap().unwrap().champions_registered);
    }

    #[test]
    fn test_register_champions_unknown_match() {
        let fx = create_fixture(vec![]);
        let live = ActiveGame {
            game_id: 1,
            participants: vec![],
        };
        let err = fx
            .engine
            .register_match_champions(uuid::Uuid::new_v4(), &live)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GameNightError>(),
            Some(GameNightError::MatchNotFound { .. })
        ));
    }

    fn live_game_for(ids: std::ops::RangeInclusive<PlayerId>) -> ActiveGame {
        ActiveGame {
            game_id: 88,
            participants: ids
                .map(|i| LiveParticipant {
                    account_id: format!("acc-{}", i),
                    champion_id: (200 + i).to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_finalize_checks_stored_result_not_caller_copy() {
        let fx = create_fixture(five_v_five());
        let game = create_test_match(&fx.store, (1..=5).collect(), (6..=10).collect());
        let outdated = game.clone();

        fx.engine.finalize(game.id, TeamSide::Blue).unwrap();
        assert!(outdated.result.is_none());

        let err = fx.engine.finalize(outdated.id, TeamSide::Red).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GameNightError>(),
            Some(GameNightError::AlreadyFinalized { .. })
        ));

        let ledger = fx.store.entries_for_match(game.id).unwrap();
        assert_eq!(ledger.len(), 10);
        assert!(ledger.iter().all(|e| !e.reverted));
        assert_eq!(points(&fx.store, 1), 1510);
        assert_eq!(points(&fx.store, 6), 1490);
    }

    #[test]
    fn test_finalize_and_revert_keep_champion_registration() {
        let fx = create_fixture(five_v_five());
        let game = create_test_match(&fx.store, (1..=5).collect(), (6..=10).collect());
        let live = live_game_for(1..=10);

        fx.engine.register_match_champions(game.id, &live).unwrap();
        fx.engine.finalize(game.id, TeamSide::Red).unwrap();
        assert!(fx.store.get_match(game.id).unwrap().unwrap().champions_registered);

        fx.engine.revert(game.id).unwrap();
        let stored = fx.store.get_match(game.id).unwrap().unwrap();
        assert!(stored.champions_registered);
        assert!(stored.result.is_none());

        assert_eq!(
            fx.engine.register_match_champions(game.id, &live).unwrap(),
            ChampionRegistration::AlreadyRegistered
        );
        assert_eq!(fx.store.picks_for_match(game.id).unwrap().len(), 10);
    }

    #[test]
    fn test_registration_keeps_stored_result() {
        let fx = create_fixture(five_v_five());
        let game = create_test_match(&fx.store, (1..=5).collect(), (6..=10).collect());

        fx.engine.finalize(game.id, TeamSide::Blue).unwrap();
        fx.engine
            .register_match_champions(game.id, &live_game_for(1..=10))
            .unwrap();

        let stored = fx.store.get_match(game.id).unwrap().unwrap();
        assert_eq!(stored.result, Some(TeamSide::Blue));
        assert!(stored.champions_registered);
    }

    #[test]
    fn test_concurrent_finalize_and_registration() {
        for _ in 0..20 {
            let fx = Arc::new(create_fixture(five_v_five()));
            let game = create_test_match(&fx.store, (1..=5).collect(), (6..=10).collect());
            let live = live_game_for(1..=10);

            let workers: Vec<_> = (0..4)
                .map(|i| {
                    let fx = fx.clone();
                    let live = live.clone();
                    std::thread::spawn(move || {
                        if i % 2 == 0 {
                            let side = if i == 0 { TeamSide::Blue } else { TeamSide::Red };
                            let _ = fx.engine.finalize(game.id, side);
                        } else {
                            fx.engine.register_match_champions(game.id, &live).unwrap();
                        }
                    })
                })
                .collect();
            for worker in workers {
                worker.join().unwrap();
            }

            let stored = fx.store.get_match(game.id).unwrap().unwrap();
            assert!(stored.result.is_some());
            assert!(stored.champions_registered);
            assert_eq!(fx.store.entries_for_match(game.id).unwrap().len(), 10);
            assert_eq!(fx.store.picks_for_match(game.id).unwrap().len(), 10);

            let total: i64 = (1..=10).map(|id| points(&fx.store, id)).sum();
            assert_eq!(total, 15000);
        }
    }

    #[test]
    fn test_reset_season() {
        let players = vec![
            Player::new(1, "a", None).with_points(1620),
            Player::new(2, "b", None).with_points(1410),
        ];
        let fx = create_fixture(players);

        let first = fx.engine.reset_season().unwrap();
        assert_eq!(first.id, 1);
        let second = fx.engine.reset_season().unwrap();
        assert_eq!(second.id, 2);

        assert_eq!(points(&fx.store, 1), 1500);
        assert_eq!(points(&fx.store, 2), 1500);

        let history = fx.store.entries_for_player(1).unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].match_id.is_none());
        assert_eq!(history[0].delta, -120);
        assert_eq!(history[1].delta, 0);

        let seasons = fx.store.list_seasons().unwrap();
        assert!(seasons[0].end_date.is_some());
        assert!(seasons[1].end_date.is_none());
    }

    #[test]
    fn test_leaderboard_and_stats() {
        let mut players = five_v_five();
        players.truncate(4);
        players.push(Player::new(99, "idle", None).with_points(2000));
        let fx = create_fixture(players);

        let game = create_test_match(&fx.store, vec![1, 2], vec![3, 4]);
        fx.engine.finalize(game.id, TeamSide::Blue).unwrap();
        create_test_match(&fx.store, vec![1, 3], vec![2, 4]);

        let board = fx.engine.leaderboard().unwrap();
        assert_eq!(board.len(), 4);
        assert!(board.iter().all(|p| p.id != 99));
        assert_eq!(board[0].points, 1501);

        let stats = fx.engine.player_stats().unwrap();
        assert_eq!(stats.len(), 4);
        assert_eq!(stats[0].player_id, 1);
        assert_eq!(stats[0].wins, 1);
        assert_eq!(stats[0].games, 1);
        assert_eq!(stats[2].losses, 1);
    }
}
