//! Cached champion catalog

use crate::champions::source::ChampionSource;
use crate::error::{GameNightError, Result};
use crate::types::{Champion, ChampionId};
use std::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct CatalogState {
    version: Option<String>,
    champions: Vec<Champion>,
}

/// Champion list of one data version, replaced as a whole on refresh
#[derive(Debug, Default)]
pub struct ChampionCatalog {
    state: RwLock<CatalogState>,
}

impl ChampionCatalog {
    /// Create an empty catalog; call [`ChampionCatalog::refresh`] before drawing
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog already holding `champions`
    pub fn with_champions(version: impl Into<String>, champions: Vec<Champion>) -> Self {
        Self {
            state: RwLock::new(CatalogState {
                version: Some(version.into()),
                champions,
            }),
        }
    }

    /// Bring the catalog up to the source's latest version.
    ///
    /// Returns `true` when a new list was swapped in. The champion list is only
    /// downloaded when the published version differs from the cached one.
    pub async fn refresh(&self, source: &dyn ChampionSource) -> Result<bool> {
        let latest = source.latest_version().await?;

        if self.version()?.as_deref() == Some(latest.as_str()) {
            debug!("Champion catalog already at version {}", latest);
            return Ok(false);
        }

        let champions = source.fetch_champions(&latest).await?;
        info!(
            "Champion catalog updated to version {} ({} champions)",
            latest,
            champions.len()
        );
        self.replace(latest, champions)?;
        Ok(true)
    }

    /// Swap in a new champion list
    pub fn replace(&self, version: String, champions: Vec<Champion>) -> Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| GameNightError::lock_poisoned("champion catalog write"))?;
        state.version = Some(version);
        state.champions = champions;
        Ok(())
    }

    /// Disposable copy of the current list for one draft
    pub fn snapshot(&self) -> Result<Vec<Champion>> {
        Ok(self.read()?.champions.clone())
    }

    pub fn version(&self) -> Result<Option<String>> {
        Ok(self.read()?.version.clone())
    }

    /// Display name of a champion, if it is in the catalog
    pub fn name_of(&self, champion_id: &ChampionId) -> Result<Option<String>> {
        Ok(self
            .read()?
            .champions
            .iter()
            .find(|c| &c.id == champion_id)
            .map(|c| c.name.clone()))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.champions.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, CatalogState>> {
        self.state
            .read()
            .map_err(|_| GameNightError::lock_poisoned("champion catalog read").into())
    }
}
