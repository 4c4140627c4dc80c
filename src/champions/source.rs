//! Champion data sources

use crate::config::ChampionSettings;
use crate::error::{GameNightError, Result};
use crate::types::Champion;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Trait for anything that can publish the champion list
#[async_trait]
pub trait ChampionSource: Send + Sync {
    /// Latest published data version
    async fn latest_version(&self) -> Result<String>;

    /// Every champion of the given version
    async fn fetch_champions(&self, version: &str) -> Result<Vec<Champion>>;
}

#[derive(Debug, Deserialize)]
struct ChampionFile {
    data: HashMap<String, ChampionEntry>,
}

#[derive(Debug, Deserialize)]
struct ChampionEntry {
    key: String,
    name: String,
}

/// Champion source backed by the Data Dragon static data CDN
pub struct DataDragonSource {
    client: Client,
    base_url: String,
    locale: String,
}

impl DataDragonSource {
    pub fn new(settings: &ChampionSettings, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.data_dragon_url.trim_end_matches('/').to_string(),
            locale: settings.locale.clone(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        if !response.status().is_success() {
            return Err(GameNightError::ExternalServiceError {
                message: format!("{} returned {}", url, response.status()),
            }
            .into());
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to decode response of {}", url))
    }
}

#[async_trait]
impl ChampionSource for DataDragonSource {
    async fn latest_version(&self) -> Result<String> {
        let url = format!("{}/api/versions.json", self.base_url);
        let versions: Vec<String> = self.get_json(&url).await?;

        versions.into_iter().next().ok_or_else(|| {
            GameNightError::ExternalServiceError {
                message: "Data Dragon published no versions".to_string(),
            }
            .into()
        })
    }

    async fn fetch_champions(&self, version: &str) -> Result<Vec<Champion>> {
        let url = format!(
            "{}/cdn/{}/data/{}/champion.json",
            self.base_url, version, self.locale
        );
        let file: ChampionFile = self.get_json(&url).await?;

        let mut champions: Vec<Champion> = file
            .data
            .into_values()
            .map(|entry| Champion::new(entry.key, entry.name))
            .collect();
        champions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(champions)
    }
}

/// Fixed champion list, for tests and offline runs
#[derive(Debug, Clone)]
pub struct StaticChampionSource {
    version: String,
    champions: Vec<Champion>,
}

impl StaticChampionSource {
    pub fn new(version: impl Into<String>, champions: Vec<Champion>) -> Self {
        Self {
            version: version.into(),
            champions,
        }
    }
}

#[async_trait]
impl ChampionSource for StaticChampionSource {
    async fn latest_version(&self) -> Result<String> {
        Ok(self.version.clone())
    }

    async fn fetch_champions(&self, _version: &str) -> Result<Vec<Champion>> {
        Ok(self.champions.clone())
    }
}
