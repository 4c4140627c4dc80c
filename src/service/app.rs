//! Application state and service wiring
//!
//! Builds the store, champion catalog, live-game client and the
//! [`GameNight`] facade from an [`AppConfig`].

use crate::champions::{ChampionCatalog, ChampionSource, DataDragonSource, StaticChampionSource};
use crate::config::AppConfig;
use crate::riot::{LiveGameClient, MockLiveGameClient, RiotClient};
use crate::service::game_night::GameNight;
use crate::storage::{GameStore, InMemoryGameStore};
use crate::types::{Champion, Season};
use crate::utils::current_timestamp;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },

    #[error("Shutdown error: {message}")]
    Shutdown { message: String },
}

/// Main application state containing all service components
pub struct AppState {
    config: AppConfig,
    game_night: Arc<GameNight>,
    champion_source: Arc<dyn ChampionSource>,
}

impl AppState {
    /// Wire every component.
    ///
    /// In dry-run mode no network client is built: the live-game client never
    /// finds a game and the catalog comes from a small fixed list.
    pub fn new(config: AppConfig, dry_run: bool) -> Result<Self, ServiceError> {
        info!("Initializing {} (dry run: {})", config.service.name, dry_run);

        let store: Arc<dyn GameStore> = Arc::new(InMemoryGameStore::with_initial_season(Season {
            id: 1,
            start_date: current_timestamp(),
            end_date: None,
        }));

        let (client, champion_source): (Arc<dyn LiveGameClient>, Arc<dyn ChampionSource>) =
            if dry_run {
                let client: Arc<dyn LiveGameClient> = Arc::new(MockLiveGameClient::new());
                let source: Arc<dyn ChampionSource> =
                    Arc::new(StaticChampionSource::new("offline", offline_champions()));
                (client, source)
            } else {
                let client =
                    RiotClient::new(&config.riot).map_err(|e| ServiceError::Configuration {
                        message: format!("Failed to create Riot client: {}", e),
                    })?;
                let source =
                    DataDragonSource::new(&config.champions, config.riot_request_timeout())
                        .map_err(|e| ServiceError::Initialization {
                            message: format!("Failed to create champion source: {}", e),
                        })?;
                let client: Arc<dyn LiveGameClient> = Arc::new(client);
                let source: Arc<dyn ChampionSource> = Arc::new(source);
                (client, source)
            };

        let catalog = Arc::new(ChampionCatalog::new());
        let game_night = Arc::new(GameNight::new(store, catalog, client, &config));

        Ok(Self {
            config,
            game_night,
            champion_source,
        })
    }

    /// Load the champion catalog. A failed download leaves the catalog as it
    /// was; draws fail with `ChampionPoolExhausted` until a refresh succeeds.
    pub async fn start(&self) -> Result<(), ServiceError> {
        info!("Starting {}", self.config.service.name);

        match self
            .game_night
            .refresh_champions(self.champion_source.as_ref())
            .await
        {
            Ok(true) => info!("Champion catalog loaded"),
            Ok(false) => info!("Champion catalog already current"),
            Err(e) => warn!("Failed to load champion catalog: {}", e),
        }

        Ok(())
    }

    /// Stop the monitor, bounded by the configured shutdown timeout
    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        info!("Starting graceful shutdown of {}", self.config.service.name);

        match tokio::time::timeout(self.config.shutdown_timeout(), self.game_night.shutdown()).await
        {
            Ok(Some(outcome)) => info!("Monitor stopped: {:?}", outcome),
            Ok(None) => info!("No monitor was running"),
            Err(_) => {
                return Err(ServiceError::Shutdown {
                    message: format!(
                        "Monitor did not stop within {:?}",
                        self.config.shutdown_timeout()
                    ),
                })
            }
        }

        info!("Shutdown of {} completed", self.config.service.name);
        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn game_night(&self) -> Arc<GameNight> {
        self.game_night.clone()
    }
}

fn offline_champions() -> Vec<Champion> {
    [
        ("266", "Aatrox"),
        ("103", "Ahri"),
        ("84", "Akali"),
        ("12", "Alistar"),
        ("32", "Amumu"),
        ("34", "Anivia"),
        ("1", "Annie"),
        ("22", "Ashe"),
        ("53", "Blitzcrank"),
        ("63", "Brand"),
        ("51", "Caitlyn"),
        ("69", "Cassiopeia"),
        ("31", "Cho'Gath"),
        ("42", "Corki"),
        ("122", "Darius"),
        ("119", "Draven"),
        ("245", "Ekko"),
        ("60", "Elise"),
        ("28", "Evelynn"),
        ("81", "Ezreal"),
    ]
    .into_iter()
    .map(|(id, name)| Champion::new(id, name))
    .collect()
}
