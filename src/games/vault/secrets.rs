//! Secret pools and secret generation.
//!
//! Pools are static and small. Difficulty comes from the guardian's
//! directive, not from the size of the search space.

use super::tier::{Level, TIER_COUNT, Tier};
use rand::Rng;
use tracing::{debug, instrument};

/// Candidate secrets per tier, indexed by [`Tier::index`].
const POOLS: [[&str; 3]; TIER_COUNT] = [
    ["hallo123", "passwort", "geheim"],
    ["sonnenschein", "blauerhimmel", "katze2024"],
    ["Regen!Bogen7", "Mond#Licht42", "Stern.Zeit99"],
    ["Xk9#mLq2!vR4", "7Tz$pW4@nQe!", "Bl4u&Fuchs?91"],
    ["9$kR!2@pL#7&qW^z", "Z#8x!Q3$m@7&V1p^", "4&Hq!9@tR#2$wK7%"],
];

/// Returns the candidate pool for a tier.
pub fn pool(tier: Tier) -> &'static [&'static str] {
    &POOLS[tier.index()]
}

/// Draws a secret for `level` uniformly from its tier's pool.
#[instrument(skip(rng))]
pub fn generate<R: Rng + ?Sized>(level: Level, rng: &mut R) -> String {
    let candidates = pool(level.tier());
    let secret = candidates[rng.gen_range(0..candidates.len())];
    debug!(tier = %level.tier(), "Generated secret");
    secret.to_string()
}

/// Draws a secret for `level`, avoiding `previous` whenever the pool has
/// another candidate.
#[instrument(skip(previous, rng))]
pub fn generate_excluding<R: Rng + ?Sized>(level: Level, previous: &str, rng: &mut R) -> String {
    let candidates: Vec<&str> = pool(level.tier())
        .iter()
        .copied()
        .filter(|candidate| *candidate != previous)
        .collect();

    if candidates.is_empty() {
        return generate(level, rng);
    }

    let secret = candidates[rng.gen_range(0..candidates.len())];
    debug!(tier = %level.tier(), "Generated replacement secret");
    secret.to_string()
}
