//! Per-player win/loss statistics derived from resolved matches

use crate::types::{Match, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player_id: PlayerId,
    pub wins: u32,
    pub losses: u32,
    pub games: u32,
    /// Wins over games, 0.0 when no games were played
    pub win_rate: f64,
}

impl PlayerStats {
    fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            wins: 0,
            losses: 0,
            games: 0,
            win_rate: 0.0,
        }
    }

    fn record(&mut self, won: bool) {
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.games += 1;
        self.win_rate = self.wins as f64 / self.games as f64;
    }
}

/// Tally wins and losses over `matches`; unresolved matches are ignored
pub fn compute_player_stats(matches: &[Match]) -> HashMap<PlayerId, PlayerStats> {
    let mut stats: HashMap<PlayerId, PlayerStats> = HashMap::new();

    for game in matches {
        let Some(winner) = game.result else {
            continue;
        };

        for player_id in game.player_ids() {
            let won = game.side_of(player_id) == Some(winner);
            stats
                .entry(player_id)
                .or_insert_with(|| PlayerStats::new(player_id))
                .record(won);
        }
    }

    stats
}
