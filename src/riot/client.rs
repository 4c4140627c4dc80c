//! Live-game client interface and implementations

use crate::config::RiotSettings;
use crate::error::{GameNightError, Result};
use crate::riot::types::{ActiveGame, RiotAccount};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode, Url};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-riot-token");

/// Failures of a live-game lookup.
///
/// `NotFound` is the normal answer while the players are still in the lobby.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LiveGameError {
    #[error("Account is not in a game")]
    NotFound,

    #[error("Live-game service answered with status {status}")]
    Http { status: u16 },

    #[error("Live-game request failed: {message}")]
    Transport { message: String },

    #[error("Failed to decode live-game response: {message}")]
    Decode { message: String },
}

/// Trait for querying the game an account is currently playing
#[async_trait]
pub trait LiveGameClient: Send + Sync {
    async fn get_active_game(&self, account_id: &str) -> std::result::Result<ActiveGame, LiveGameError>;
}

/// HTTP client for the Riot spectator and account endpoints
pub struct RiotClient {
    client: Client,
    platform_url: Url,
    regional_url: Url,
}

impl RiotClient {
    pub fn new(settings: &RiotSettings) -> Result<Self> {
        if settings.api_key.is_empty() {
            return Err(GameNightError::ConfigurationError {
                message: "Riot API key is not set".to_string(),
            }
            .into());
        }

        let mut api_key = HeaderValue::from_str(&settings.api_key).map_err(|_| {
            GameNightError::ConfigurationError {
                message: "Riot API key contains invalid header characters".to_string(),
            }
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.request_timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            platform_url: parse_base_url(&settings.platform_url)?,
            regional_url: parse_base_url(&settings.regional_url)?,
        })
    }

    /// Resolve a Riot id (`game_name#tag_line`) to its account.
    ///
    /// Returns `None` when no such account exists.
    pub async fn get_account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Option<RiotAccount>> {
        let url = endpoint(
            &self.regional_url,
            &["riot", "account", "v1", "accounts", "by-riot-id", game_name, tag_line],
        )?;

        match self.get_json::<RiotAccount>(url).await {
            Ok(account) => Ok(Some(account)),
            Err(LiveGameError::NotFound) => Ok(None),
            Err(e) => Err(GameNightError::ExternalServiceError {
                message: e.to_string(),
            }
            .into()),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
    ) -> std::result::Result<T, LiveGameError> {
        debug!("GET {}", url.path());
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LiveGameError::Transport {
                message: e.to_string(),
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(LiveGameError::NotFound),
            status if !status.is_success() => Err(LiveGameError::Http {
                status: status.as_u16(),
            }),
            _ => response.json::<T>().await.map_err(|e| LiveGameError::Decode {
                message: e.to_string(),
            }),
        }
    }
}

#[async_trait]
impl LiveGameClient for RiotClient {
    async fn get_active_game(&self, account_id: &str) -> std::result::Result<ActiveGame, LiveGameError> {
        let url = endpoint(
            &self.platform_url,
            &["lol", "spectator", "v5", "active-games", "by-summoner", account_id],
        )
        .map_err(|e| LiveGameError::Transport {
            message: e.to_string(),
        })?;

        self.get_json(url).await
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| GameNightError::ConfigurationError {
        message: format!("Invalid URL {}: {}", raw, e),
    })?;
    if url.cannot_be_a_base() {
        return Err(GameNightError::ConfigurationError {
            message: format!("URL {} cannot be used as a base", raw),
        }
        .into());
    }
    Ok(url)
}

/// Append percent-encoded path segments to `base`
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| GameNightError::InternalError {
            message: format!("URL {} cannot be used as a base", base),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Scripted live-game client.
///
/// Answers are replayed in order; once the script runs out every call answers
/// `NotFound`.
#[derive(Debug, Default)]
pub struct MockLiveGameClient {
    script: Mutex<VecDeque<std::result::Result<ActiveGame, LiveGameError>>>,
    queried: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MockLiveGameClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client that replays `responses` in order
    pub fn with_responses(responses: Vec<std::result::Result<ActiveGame, LiveGameError>>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    pub fn push_response(&self, response: std::result::Result<ActiveGame, LiveGameError>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(response);
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Account ids queried so far, in order
    pub fn queried_accounts(&self) -> Vec<String> {
        self.queried
            .lock()
            .map(|queried| queried.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LiveGameClient for MockLiveGameClient {
    async fn get_active_game(&self, account_id: &str) -> std::result::Result<ActiveGame, LiveGameError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut queried) = self.queried.lock() {
            queried.push(account_id.to_string());
        }

        self.script
            .lock()
            .map_err(|_| LiveGameError::Transport {
                message: "mock script lock poisoned".to_string(),
            })?
            .pop_front()
            .unwrap_or(Err(LiveGameError::NotFound))
    }
}
