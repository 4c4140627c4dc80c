//! Team balancer implementation
//!
//! Every distinct way of halving the pool is scored by the gap between the two
//! halves' mean points. The final pairing is drawn uniformly from the closest
//! few splits rather than always taking the single closest one.

use crate::config::BalancerConfig;
use crate::error::{GameNightError, Result};
use crate::teams::draft::{draft_champions, draft_iterations};
use crate::types::{Champion, Player, Team, TeamSide};
use crate::utils::{mean_points, rating_difference};
use itertools::Itertools;
use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, info};

/// One way of dividing the pool into two halves (indices into the pool)
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub team_a: Vec<usize>,
    pub team_b: Vec<usize>,
    pub rating_a: f64,
    pub rating_b: f64,
    pub elo_difference: f64,
}

/// Enumerate every distinct split of an even pool.
///
/// A split and its mirror image are the same matchup, so only splits that put
/// the first player on side A are produced: C(N, N/2) / 2 of them.
pub fn enumerate_splits(players: &[Player]) -> Vec<Split> {
    let n = players.len();
    if n < 2 {
        return Vec::new();
    }
    let half = n / 2;

    (1..n)
        .combinations(half - 1)
        .map(|rest| {
            let mut team_a = Vec::with_capacity(half);
            team_a.push(0);
            team_a.extend(rest);

            let team_b: Vec<usize> = (0..n).filter(|i| !team_a.contains(i)).collect();

            let rating_a = mean_points(&team_a.iter().map(|&i| &players[i]).collect::<Vec<_>>());
            let rating_b = mean_points(&team_b.iter().map(|&i| &players[i]).collect::<Vec<_>>());

            Split {
                team_a,
                team_b,
                rating_a,
                rating_b,
                elo_difference: rating_difference(rating_a, rating_b),
            }
        })
        .collect()
}

/// Size of the pool the final split is drawn from
pub fn closest_pool_size(num_splits: usize, cap: usize) -> usize {
    let size = cap.min(num_splits / 2);
    if size == 0 {
        num_splits
    } else {
        size
    }
}

/// Forms two balanced teams out of a player pool
#[derive(Debug, Clone, Default)]
pub struct TeamBalancer {
    config: BalancerConfig,
}

impl TeamBalancer {
    pub fn new(config: BalancerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BalancerConfig {
        &self.config
    }

    /// Form a blue and a red team from `players`.
    ///
    /// `catalog` is the disposable copy the champion draft is dealt from.
    /// Returns `(blue, red)`.
    pub fn form_teams<R: Rng + ?Sized>(
        &self,
        players: &[Player],
        mut catalog: Vec<Champion>,
        draft_count: usize,
        rng: &mut R,
    ) -> Result<(Team, Team)> {
        if players.len() < 2 || players.len() % 2 != 0 {
            return Err(GameNightError::InvalidPoolSize {
                size: players.len(),
            }
            .into());
        }

        let mut seen = HashSet::with_capacity(players.len());
        for player in players {
            if !seen.insert(player.id) {
                return Err(GameNightError::DuplicatePlayer {
                    player_id: player.id,
                }
                .into());
            }
        }

        let team_size = players.len() / 2;
        let iterations = draft_iterations(draft_count, team_size);
        if catalog.len() < iterations * 2 {
            return Err(GameNightError::ChampionPoolExhausted {
                required: iterations * 2,
                available: catalog.len(),
            }
            .into());
        }

        let mut splits = enumerate_splits(players);
        splits.sort_by(|a, b| a.elo_difference.total_cmp(&b.elo_difference));

        let pool_size = closest_pool_size(splits.len(), self.config.closest_pool_cap);
        let chosen = &splits[rng.random_range(0..pool_size)];

        debug!(
            "Chose split {:.1} vs {:.1} (gap {:.1}) out of the {} closest of {} splits",
            chosen.rating_a,
            chosen.rating_b,
            chosen.elo_difference,
            pool_size,
            splits.len()
        );

        let (champions_a, champions_b) = draft_champions(&mut catalog, iterations, rng)?;

        let team_a = Team {
            side: TeamSide::Blue,
            players: chosen.team_a.iter().map(|&i| players[i].id).collect(),
            champions: champions_a,
            team_rating: chosen.rating_a,
        };
        let team_b = Team {
            side: TeamSide::Red,
            players: chosen.team_b.iter().map(|&i| players[i].id).collect(),
            champions: champions_b,
            team_rating: chosen.rating_b,
        };

        // Sides carry no balance meaning, only the pairing does
        let (mut blue, mut red) = if rng.random_bool(0.5) {
            (team_b, team_a)
        } else {
            (team_a, team_b)
        };
        blue.side = TeamSide::Blue;
        red.side = TeamSide::Red;

        info!(
            "Formed {}v{} teams - blue: {:.1}, red: {:.1}, {} champion options each",
            team_size,
            team_size,
            blue.team_rating,
            red.team_rating,
            iterations
        );

        Ok((blue, red))
    }
}
