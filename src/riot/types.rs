//! Wire types of the live-game service

use crate::types::{AccountId, ChampionId};
use serde::{Deserialize, Deserializer, Serialize};

/// Account as returned by the account lookup endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiotAccount {
    pub puuid: AccountId,
    #[serde(rename = "gameName")]
    pub game_name: String,
    #[serde(rename = "tagLine")]
    pub tag_line: String,
}

/// One participant of a game in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveParticipant {
    #[serde(rename = "puuid")]
    pub account_id: AccountId,
    #[serde(rename = "championId", deserialize_with = "champion_id_from_any")]
    pub champion_id: ChampionId,
}

/// A game in progress as reported by the spectator endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveGame {
    #[serde(rename = "gameId")]
    pub game_id: i64,
    #[serde(default)]
    pub participants: Vec<LiveParticipant>,
}

impl ActiveGame {
    /// Whether every account in `tracked` takes part in this game
    pub fn contains_all<'a, I>(&self, tracked: I) -> bool
    where
        I: IntoIterator<Item = &'a AccountId>,
    {
        tracked
            .into_iter()
            .all(|account| self.participants.iter().any(|p| &p.account_id == account))
    }
}

/// The spectator endpoint sends numeric champion ids, the catalog keys are strings
fn champion_id_from_any<'de, D>(deserializer: D) -> Result<ChampionId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawChampionId {
        Number(i64),
        Text(String),
    }

    Ok(match RawChampionId::deserialize(deserializer)? {
        RawChampionId::Number(n) => n.to_string(),
        RawChampionId::Text(s) => s,
    })
}
