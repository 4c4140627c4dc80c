//! Game-night facade
//!
//! The thin adapter a command layer (chat bot, CLI, HTTP) calls. Each method
//! maps to one command and delegates to the balancer, the rating engine or the
//! monitor.

use crate::champions::{ChampionCatalog, ChampionSource};
use crate::config::AppConfig;
use crate::error::{GameNightError, Result};
use crate::monitor::{MatchMonitor, MonitorOutcome, MonitorState};
use crate::rating::{PlayerStats, RatingEngine, RatingOutcome, RevertOutcome};
use crate::riot::LiveGameClient;
use crate::storage::{ChampionPickStore, GameStore, MatchStore, PlayerStore, SeasonStore};
use crate::teams::TeamBalancer;
use crate::types::{
    AccountId, Match, MatchId, Player, PlayerId, PlayerMatchChampion, Season, TeamSide,
};
use std::sync::Arc;
use tracing::info;

pub struct GameNight {
    store: Arc<dyn GameStore>,
    catalog: Arc<ChampionCatalog>,
    balancer: TeamBalancer,
    engine: Arc<RatingEngine>,
    monitor: MatchMonitor,
}

impl GameNight {
    pub fn new(
        store: Arc<dyn GameStore>,
        catalog: Arc<ChampionCatalog>,
        client: Arc<dyn LiveGameClient>,
        config: &AppConfig,
    ) -> Self {
        let engine = Arc::new(RatingEngine::new(store.clone(), config.rating.clone()));
        let monitor = MatchMonitor::new(
            client,
            engine.clone(),
            store.clone(),
            config.monitor.clone(),
        );

        Self {
            store,
            catalog,
            balancer: TeamBalancer::new(config.teams.clone()),
            engine,
            monitor,
        }
    }

    /// Register a player, or update the name and account of a known one
    pub fn register_player(
        &self,
        player_id: PlayerId,
        name: &str,
        account_id: Option<AccountId>,
    ) -> Result<Player> {
        self.engine.register_player(player_id, name, account_id)
    }

    /// Form two balanced teams out of `player_ids`, store the match in the
    /// current season and start monitoring it.
    pub async fn draw_match(&self, player_ids: &[PlayerId], draft_count: usize) -> Result<Match> {
        let known = self.store.get_players(player_ids)?;
        let players = player_ids
            .iter()
            .map(|id| {
                known
                    .get(id)
                    .cloned()
                    .ok_or(GameNightError::PlayerNotFound { player_id: *id })
            })
            .collect::<std::result::Result<Vec<Player>, GameNightError>>()?;

        let (blue, red) = {
            let mut rng = rand::rng();
            self.balancer
                .form_teams(&players, self.catalog.snapshot()?, draft_count, &mut rng)?
        };

        let season_id = self.store.current_season()?.map(|season| season.id);
        let game = Match::new(blue, red, season_id)?;
        self.store.create_match(game.clone())?;

        info!(
            "Match {} drawn ({}v{}, season {:?})",
            game.id, game.mode, game.mode, season_id
        );

        self.monitor.start(game.id).await?;
        Ok(game)
    }

    pub fn finalize_match(&self, match_id: MatchId, winning_side: TeamSide) -> Result<RatingOutcome> {
        self.engine.finalize(match_id, winning_side)
    }

    pub fn revert_match(&self, match_id: MatchId) -> Result<RevertOutcome> {
        self.engine.revert(match_id)
    }

    pub async fn start_monitoring(&self, match_id: MatchId) -> Result<()> {
        self.monitor.start(match_id).await
    }

    pub async fn stop_monitoring(&self) -> Option<MonitorOutcome> {
        self.monitor.stop().await
    }

    pub async fn monitor_state(&self) -> MonitorState {
        self.monitor.state().await
    }

    pub fn reset_season(&self) -> Result<Season> {
        self.engine.reset_season()
    }

    pub fn leaderboard(&self) -> Result<Vec<Player>> {
        self.engine.leaderboard()
    }

    pub fn player_stats(&self) -> Result<Vec<PlayerStats>> {
        self.engine.player_stats()
    }

    /// Champions confirmed for a match, as registered by the monitor
    pub fn match_champions(&self, match_id: MatchId) -> Result<Vec<PlayerMatchChampion>> {
        self.store.picks_for_match(match_id)
    }

    /// Pull the latest champion list if a new version was published
    pub async fn refresh_champions(&self, source: &dyn ChampionSource) -> Result<bool> {
        self.catalog.refresh(source).await
    }

    /// Stop background work; returns how the monitor ended, if one was running
    pub async fn shutdown(&self) -> Option<MonitorOutcome> {
        info!("Shutting down game night");
        self.monitor.stop().await
    }
}
