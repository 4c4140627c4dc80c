//! Champion draft dealing
//!
//! Both sides draw from one shared catalog without replacement, alternating
//! blue-first, so no champion is ever offered to both teams.

use crate::error::{GameNightError, Result};
use crate::types::{Champion, ChampionId};
use rand::Rng;

/// Number of draft rounds: the requested count, or two per roster slot
pub fn draft_iterations(draft_count: usize, team_size: usize) -> usize {
    if draft_count > 0 {
        draft_count
    } else {
        team_size * 2
    }
}

/// Deal `iterations` champions to each side out of `catalog`.
///
/// The catalog is consumed by removal. Fails with `ChampionPoolExhausted`
/// before drawing anything if it cannot cover both sides.
pub fn draft_champions<R: Rng + ?Sized>(
    catalog: &mut Vec<Champion>,
    iterations: usize,
    rng: &mut R,
) -> Result<(Vec<ChampionId>, Vec<ChampionId>)> {
    let required = iterations * 2;
    if catalog.len() < required {
        return Err(GameNightError::ChampionPoolExhausted {
            required,
            available: catalog.len(),
        }
        .into());
    }

    let mut side_a = Vec::with_capacity(iterations);
    let mut side_b = Vec::with_capacity(iterations);

    for _ in 0..iterations {
        let choice_a = rng.random_range(0..catalog.len());
        side_a.push(catalog.remove(choice_a).id);

        let choice_b = rng.random_range(0..catalog.len());
        side_b.push(catalog.remove(choice_b).id);
    }

    Ok((side_a, side_b))
}
