//! Level numbering and the level-to-tier table.
//!
//! Levels come in pairs: both levels of a [`Tier`] share one secret pool
//! and one guardian directive. Boundaries are derived from
//! [`LEVELS_PER_TIER`] rather than spelled out per level.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::instrument;

/// Highest level of the vault. Guessing this level's secret wins the game.
pub const MAX_LEVEL: u8 = 10;

/// Number of consecutive levels sharing a tier.
pub const LEVELS_PER_TIER: u8 = 2;

/// Number of difficulty tiers.
pub const TIER_COUNT: usize = (MAX_LEVEL / LEVELS_PER_TIER) as usize;

/// A vault level, always within `1..=MAX_LEVEL`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    /// The level every session starts on.
    pub const FIRST: Level = Level(1);

    /// The final level.
    pub const MAX: Level = Level(MAX_LEVEL);

    /// Creates a level, clamping out-of-range input into `1..=MAX_LEVEL`.
    #[instrument]
    pub fn new(n: u32) -> Self {
        let clamped = n.clamp(1, MAX_LEVEL as u32) as u8;
        Self(clamped)
    }

    /// Returns the level number.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Returns the following level, or `None` at [`Level::MAX`].
    pub fn next(self) -> Option<Level> {
        (self.0 < MAX_LEVEL).then(|| Level(self.0 + 1))
    }

    /// True on the final level.
    pub fn is_max(self) -> bool {
        self.0 == MAX_LEVEL
    }

    /// Returns the tier this level belongs to.
    pub fn tier(self) -> Tier {
        Tier::for_level(self)
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        if (1..=MAX_LEVEL).contains(&n) {
            Ok(Self(n))
        } else {
            Err(format!("Level {} out of range 1..={}", n, MAX_LEVEL))
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

/// Difficulty tier of the guardian.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Levels 1-2: the guardian gives in under mild pressure.
    Novice,
    /// Levels 3-4: the guardian needs a plausible pretext.
    Apprentice,
    /// Levels 5-6: the guardian wants a consistent story and some persistence.
    Sentinel,
    /// Levels 7-8: the guardian resists direct tricks and role-play.
    Warden,
    /// Levels 9-10: only a flawless multi-step social-engineering attack works.
    Archon,
}

impl Tier {
    /// All tiers, easiest first. Indexed by [`Tier::index`].
    pub const ALL: [Tier; TIER_COUNT] = [
        Tier::Novice,
        Tier::Apprentice,
        Tier::Sentinel,
        Tier::Warden,
        Tier::Archon,
    ];

    /// Looks up the tier for a level.
    pub fn for_level(level: Level) -> Tier {
        Self::ALL[((level.get() - 1) / LEVELS_PER_TIER) as usize]
    }

    /// Zero-based position in [`Tier::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// One-based tier number, as shown to the guardian.
    pub fn number(self) -> usize {
        self.index() + 1
    }

    /// The levels covered by this tier.
    pub fn levels(self) -> RangeInclusive<u8> {
        let first = self.index() as u8 * LEVELS_PER_TIER + 1;
        first..=first + LEVELS_PER_TIER - 1
    }
}
