//! Single-slot match monitor
//!
//! At most one monitoring task runs at a time. [`MatchMonitor::start`] always
//! cancels the running task and waits for it to finish before spawning the
//! next one, so two loops can never race to register champions.

use crate::config::MonitorConfig;
use crate::error::{GameNightError, Result};
use crate::rating::{ChampionRegistration, RatingEngine};
use crate::riot::client::{LiveGameClient, LiveGameError};
use crate::storage::{GameStore, MatchStore, PlayerStore};
use crate::types::{AccountId, MatchId, PlayerId};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// How a monitoring task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorOutcome {
    /// The roster was seen in one live game and champions were registered
    MatchFound { game_id: i64 },
    /// The timeout passed without the roster showing up
    TimedOut,
    /// Stopped by [`MatchMonitor::stop`] or by a newer `start`
    Cancelled,
    /// No player of the match has a linked account, or the match is gone
    Untrackable,
}

/// What the monitor is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Monitoring { match_id: MatchId },
}

struct ActiveMonitor {
    generation: u64,
    match_id: MatchId,
    token: CancellationToken,
    handle: JoinHandle<MonitorOutcome>,
    /// Set once the task has produced its outcome
    done: watch::Receiver<Option<MonitorOutcome>>,
}

/// Everything one polling task needs, owned so it can be moved into the task
struct MonitorTask {
    match_id: MatchId,
    client: Arc<dyn LiveGameClient>,
    engine: Arc<RatingEngine>,
    store: Arc<dyn GameStore>,
    poll_interval: Duration,
    timeout: Duration,
    token: CancellationToken,
}

impl MonitorTask {
    async fn run(self) -> MonitorOutcome {
        let started = Instant::now();
        let mut rng = StdRng::from_os_rng();
        let mut tick = 0u32;

        info!(
            "Monitoring match {} (poll every {:?}, give up after {:?})",
            self.match_id, self.poll_interval, self.timeout
        );

        while started.elapsed() < self.timeout {
            tick += 1;

            let tracked = match self.tracked_accounts() {
                Ok(tracked) if tracked.is_empty() => {
                    warn!(
                        "Match {} has no players with a linked account; nothing to monitor",
                        self.match_id
                    );
                    return MonitorOutcome::Untrackable;
                }
                Ok(tracked) => tracked,
                Err(e) => {
                    warn!("Stopping monitor for match {}: {}", self.match_id, e);
                    return MonitorOutcome::Untrackable;
                }
            };

            let Some(account_id) = tracked.choose(&mut rng).cloned() else {
                return MonitorOutcome::Untrackable;
            };

            debug!(
                "Match {} tick {}: querying account {}",
                self.match_id, tick, account_id
            );

            let response = select! {
                biased;
                _ = self.token.cancelled() => return self.cancelled(),
                response = self.client.get_active_game(&account_id) => response,
            };

            match response {
                Ok(game) if game.contains_all(&tracked) => {
                    match self.engine.register_match_champions(self.match_id, &game) {
                        Ok(registration) => {
                            if registration == ChampionRegistration::AlreadyRegistered {
                                debug!("Champions of match {} were registered earlier", self.match_id);
                            }
                            info!(
                                "Match {} confirmed in live game {} after {} polls",
                                self.match_id, game.game_id, tick
                            );
                            return MonitorOutcome::MatchFound {
                                game_id: game.game_id,
                            };
                        }
                        Err(e) => {
                            error!(
                                "Failed to register champions for match {}: {}",
                                self.match_id, e
                            );
                        }
                    }
                }
                Ok(game) => {
                    debug!(
                        "Live game {} does not hold the whole roster of match {}",
                        game.game_id, self.match_id
                    );
                }
                Err(LiveGameError::NotFound) => {
                    debug!("Account {} is not in a game yet", account_id);
                }
                Err(e) => {
                    warn!("Live-game lookup for match {} failed: {}", self.match_id, e);
                }
            }

            select! {
                biased;
                _ = self.token.cancelled() => return self.cancelled(),
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        info!(
            "Match {} not seen in a live game within {:?}; champions stay unregistered",
            self.match_id, self.timeout
        );
        MonitorOutcome::TimedOut
    }

    /// Account ids of every player of the match that has one, roster order
    fn tracked_accounts(&self) -> Result<Vec<AccountId>> {
        let game = self
            .store
            .get_match(self.match_id)?
            .ok_or(GameNightError::MatchNotFound {
                match_id: self.match_id,
            })?;

        let player_ids: Vec<PlayerId> = game.player_ids().collect();
        let players = self.store.get_players(&player_ids)?;

        Ok(player_ids
            .iter()
            .filter_map(|id| players.get(id))
            .filter_map(|player| player.account_id.clone())
            .collect())
    }

    fn cancelled(&self) -> MonitorOutcome {
        info!("Monitor for match {} cancelled", self.match_id);
        MonitorOutcome::Cancelled
    }
}

/// Owns the one monitoring slot
pub struct MatchMonitor {
    client: Arc<dyn LiveGameClient>,
    engine: Arc<RatingEngine>,
    store: Arc<dyn GameStore>,
    config: MonitorConfig,
    slot: Mutex<Option<ActiveMonitor>>,
    generations: AtomicU64,
}

impl MatchMonitor {
    pub fn new(
        client: Arc<dyn LiveGameClient>,
        engine: Arc<RatingEngine>,
        store: Arc<dyn GameStore>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            client,
            engine,
            store,
            config,
            slot: Mutex::new(None),
            generations: AtomicU64::new(0),
        }
    }

    /// Start monitoring `match_id`, replacing whatever was monitored before.
    ///
    /// The previous task has fully terminated by the time the new one is
    /// spawned. The slot stays locked in between, so no other caller can
    /// observe or fill it halfway.
    pub async fn start(&self, match_id: MatchId) -> Result<()> {
        if self.store.get_match(match_id)?.is_none() {
            return Err(GameNightError::MatchNotFound { match_id }.into());
        }

        let mut slot = self.slot.lock().await;
        if let Some(previous) = slot.as_mut() {
            Self::terminate(previous).await;
        }

        let token = CancellationToken::new();
        let task = MonitorTask {
            match_id,
            client: self.client.clone(),
            engine: self.engine.clone(),
            store: self.store.clone(),
            poll_interval: self.config.poll_interval(),
            timeout: self.config.timeout(),
            token: token.clone(),
        };

        let (done_tx, done) = watch::channel(None);
        let handle = tokio::spawn(async move {
            let outcome = task.run().await;
            done_tx.send_replace(Some(outcome));
            outcome
        });

        *slot = Some(ActiveMonitor {
            generation: self.generations.fetch_add(1, Ordering::Relaxed),
            match_id,
            token,
            handle,
            done,
        });

        Ok(())
    }

    /// Cancel the running task, if any, and wait for it to finish.
    ///
    /// The slot is cleared only after the task has returned. A task that
    /// already finished on its own reports its real outcome rather than
    /// `Cancelled`.
    pub async fn stop(&self) -> Option<MonitorOutcome> {
        let mut slot = self.slot.lock().await;
        let outcome = Self::terminate(slot.as_mut()?).await;
        *slot = None;
        outcome
    }

    /// Wait for the running task to end, without cancelling it.
    ///
    /// The task keeps its slot while it runs, so a concurrent `start` or
    /// `stop` still finds and terminates it. Returns `Cancelled` if that
    /// happens.
    pub async fn wait(&self) -> Option<MonitorOutcome> {
        let (generation, mut done) = {
            let slot = self.slot.lock().await;
            let active = slot.as_ref()?;
            (active.generation, active.done.clone())
        };

        let outcome = match done.wait_for(Option::is_some).await {
            Ok(outcome) => *outcome,
            Err(_) => None,
        };

        let mut slot = self.slot.lock().await;
        if let Some(active) = slot
            .as_mut()
            .filter(|active| active.generation == generation)
        {
            Self::join(active).await;
            *slot = None;
        }

        outcome
    }

    pub async fn state(&self) -> MonitorState {
        match self.slot.lock().await.as_ref() {
            Some(active) if !active.handle.is_finished() => MonitorState::Monitoring {
                match_id: active.match_id,
            },
            _ => MonitorState::Idle,
        }
    }

    async fn terminate(active: &mut ActiveMonitor) -> Option<MonitorOutcome> {
        debug!("Stopping monitor for match {}", active.match_id);
        active.token.cancel();
        Self::join(active).await
    }

    async fn join(active: &mut ActiveMonitor) -> Option<MonitorOutcome> {
        match (&mut active.handle).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!("Monitor task for match {} failed: {}", active.match_id, e);
                None
            }
        }
    }
}
