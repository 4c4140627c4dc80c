//! Test fixtures shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use game_night::config::{AppConfig, MonitorConfig, RatingConfig};
use game_night::riot::{ActiveGame, LiveGameClient, LiveGameError, LiveParticipant};
use game_night::storage::{InMemoryGameStore, MatchStore, PlayerStore};
use game_night::types::{Champion, Match, Player, PlayerId, Season, Team, TeamSide};
use game_night::utils::current_timestamp;
use game_night::{ChampionCatalog, GameNight, MatchMonitor, RatingEngine};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Live-game client whose lookups never complete
#[derive(Debug, Default)]
pub struct PendingLiveGameClient {
    started: AtomicUsize,
}

impl PendingLiveGameClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lookups that were started (none of them ever finished)
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LiveGameClient for PendingLiveGameClient {
    async fn get_active_game(&self, _account_id: &str) -> Result<ActiveGame, LiveGameError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

/// Player `id` with account `acc-{id}`
pub fn create_test_player(id: PlayerId) -> Player {
    Player::new(id, format!("player{}", id), Some(format!("acc-{}", id)))
}

/// Store with one open season and players `1..=count`
pub fn create_test_store(count: u64) -> Arc<InMemoryGameStore> {
    let store = Arc::new(InMemoryGameStore::with_initial_season(Season {
        id: 1,
        start_date: current_timestamp(),
        end_date: None,
    }));
    for id in 1..=count {
        store.save_player(create_test_player(id)).unwrap();
    }
    store
}

pub fn create_test_catalog(size: usize) -> Vec<Champion> {
    (0..size)
        .map(|i| Champion::new((i + 1).to_string(), format!("Champion {}", i + 1)))
        .collect()
}

/// Store an unresolved match between `blue` and `red`
pub fn create_stored_match(
    store: &InMemoryGameStore,
    blue: Vec<PlayerId>,
    red: Vec<PlayerId>,
) -> Match {
    let team = |side, players| Team {
        side,
        players,
        champions: vec![],
        team_rating: 1500.0,
    };
    let game = Match::new(team(TeamSide::Blue, blue), team(TeamSide::Red, red), Some(1)).unwrap();
    store.create_match(game.clone()).unwrap();
    game
}

/// Live game in which every given player plays, plus one stranger
pub fn live_game_with(game_id: i64, player_ids: &[PlayerId]) -> ActiveGame {
    let mut participants: Vec<LiveParticipant> = player_ids
        .iter()
        .map(|id| LiveParticipant {
            account_id: format!("acc-{}", id),
            champion_id: (100 + id).to_string(),
        })
        .collect();
    participants.push(LiveParticipant {
        account_id: "stranger".to_string(),
        champion_id: "1".to_string(),
    });
    ActiveGame {
        game_id,
        participants,
    }
}

pub fn create_test_monitor(
    store: Arc<InMemoryGameStore>,
    client: Arc<dyn LiveGameClient>,
) -> MatchMonitor {
    let engine = Arc::new(RatingEngine::new(store.clone(), RatingConfig::default()));
    MatchMonitor::new(client, engine, store, MonitorConfig::default())
}

pub fn create_test_game_night(
    store: Arc<InMemoryGameStore>,
    client: Arc<dyn LiveGameClient>,
) -> GameNight {
    let catalog = Arc::new(ChampionCatalog::with_champions("test", create_test_catalog(40)));
    GameNight::new(store, catalog, client, &AppConfig::default())
}
