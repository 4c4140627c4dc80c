//! Main application configuration
//!
//! This module defines the primary configuration structures for the game-night
//! service, including environment variable and TOML file loading and validation.

use crate::config::{BalancerConfig, MonitorConfig, RatingConfig};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub riot: RiotSettings,
    pub champions: ChampionSettings,
    pub monitor: MonitorConfig,
    pub rating: RatingConfig,
    pub teams: BalancerConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

/// Live-game service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiotSettings {
    /// API key sent with every request
    pub api_key: String,
    /// Platform host serving the spectator endpoints
    pub platform_url: String,
    /// Regional host serving the account endpoints
    pub regional_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_seconds: u64,
}

/// Champion data service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChampionSettings {
    pub data_dragon_url: String,
    pub locale: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "game-night".to_string(),
            log_level: "info".to_string(),
            shutdown_timeout_seconds: 10,
        }
    }
}

impl Default for RiotSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            platform_url: "https://br1.api.riotgames.com".to_string(),
            regional_url: "https://americas.api.riotgames.com".to_string(),
            request_timeout_seconds: 10,
        }
    }
}

impl Default for ChampionSettings {
    fn default() -> Self {
        Self {
            data_dragon_url: "https://ddragon.leagueoflegends.com".to_string(),
            locale: "pt_BR".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; environment variables still win
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Live-game service settings
        if let Ok(api_key) = env::var("RIOT_API_KEY") {
            self.riot.api_key = api_key;
        }
        if let Ok(url) = env::var("RIOT_PLATFORM_URL") {
            self.riot.platform_url = url;
        }
        if let Ok(url) = env::var("RIOT_REGIONAL_URL") {
            self.riot.regional_url = url;
        }
        if let Ok(timeout) = env::var("RIOT_REQUEST_TIMEOUT_SECONDS") {
            self.riot.request_timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid RIOT_REQUEST_TIMEOUT_SECONDS value: {}", timeout))?;
        }

        // Monitor settings
        if let Ok(interval) = env::var("MONITOR_POLL_INTERVAL_SECONDS") {
            self.monitor.poll_interval_seconds = interval.parse().map_err(|_| {
                anyhow!("Invalid MONITOR_POLL_INTERVAL_SECONDS value: {}", interval)
            })?;
        }
        if let Ok(timeout) = env::var("MONITOR_TIMEOUT_SECONDS") {
            self.monitor.timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid MONITOR_TIMEOUT_SECONDS value: {}", timeout))?;
        }

        // Rating and balancing settings
        if let Ok(points) = env::var("DEFAULT_POINTS") {
            self.rating.default_points = points
                .parse()
                .map_err(|_| anyhow!("Invalid DEFAULT_POINTS value: {}", points))?;
        }
        if let Ok(cap) = env::var("CLOSEST_POOL_CAP") {
            self.teams.closest_pool_cap = cap
                .parse()
                .map_err(|_| anyhow!("Invalid CLOSEST_POOL_CAP value: {}", cap))?;
        }

        Ok(())
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Get live-game request timeout as Duration
    pub fn riot_request_timeout(&self) -> Duration {
        Duration::from_secs(self.riot.request_timeout_seconds)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }

    if config.riot.platform_url.is_empty() || config.riot.regional_url.is_empty() {
        return Err(anyhow!("Live-game service URLs cannot be empty"));
    }
    if config.riot.request_timeout_seconds == 0 {
        return Err(anyhow!("Live-game request timeout must be greater than 0"));
    }
    if config.champions.data_dragon_url.is_empty() {
        return Err(anyhow!("Champion data URL cannot be empty"));
    }

    if config.monitor.poll_interval_seconds == 0 {
        return Err(anyhow!("Monitor poll interval must be greater than 0"));
    }
    if config.monitor.poll_interval_seconds >= config.monitor.timeout_seconds {
        return Err(anyhow!(
            "Monitor poll interval ({}s) must be shorter than its timeout ({}s)",
            config.monitor.poll_interval_seconds,
            config.monitor.timeout_seconds
        ));
    }

    if config.rating.default_k_factor == 0 || config.rating.k_factors.iter().any(|k| k.k == 0) {
        return Err(anyhow!("K-factors must be at least 1"));
    }
    if config.teams.closest_pool_cap == 0 {
        return Err(anyhow!("Closest pool cap must be at least 1"));
    }

    Ok(())
}
