//! Collectible templates, instances and rarity tiers.
//!
//! # Invariants
//! - `RarityTier` ordering is ascending rarity: `Common < Rare < Epic < Legendary`.
//! - Instances always carry `star_level >= 1`; persisted zero/missing values
//!   are normalized to 1 on load, and so are explicit `null`s.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Stable identifier for one acquired collectible.
pub type CollectibleId = Uuid;

/// Minimum star level of any collectible instance.
pub const BASE_STAR_LEVEL: u32 = 1;

/// Rarity tier of a collectible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RarityTier {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl RarityTier {
    /// All tiers in ascending rarity.
    pub const ALL: [RarityTier; 4] = [Self::Common, Self::Rare, Self::Epic, Self::Legendary];

    /// Stable display/log label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }
}

/// Immutable catalog entry. `name` is the identity key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectibleTemplate {
    pub name: &'static str,
    pub rarity: RarityTier,
    pub image_ref: &'static str,
    pub flavor_text: &'static str,
}

impl CollectibleTemplate {
    /// Creates a fresh base-level instance of this template.
    pub fn instantiate(&self, acquired_at: i64) -> CollectibleInstance {
        CollectibleInstance {
            id: Uuid::new_v4(),
            name: self.name.to_string(),
            rarity: self.rarity,
            image_ref: self.image_ref.to_string(),
            flavor_text: self.flavor_text.to_string(),
            acquired_at,
            star_level: BASE_STAR_LEVEL,
        }
    }
}

/// One collectible owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectibleInstance {
    pub id: CollectibleId,
    pub name: String,
    pub rarity: RarityTier,
    pub image_ref: String,
    #[serde(default)]
    pub flavor_text: String,
    /// Unix epoch milliseconds.
    pub acquired_at: i64,
    /// Base level plus one per merged duplicate.
    #[serde(default = "default_star_level", deserialize_with = "star_level_or_base")]
    pub star_level: u32,
}

impl CollectibleInstance {
    /// Repairs values that older blobs may carry.
    pub(crate) fn normalize(mut self) -> Self {
        if self.star_level < BASE_STAR_LEVEL {
            self.star_level = BASE_STAR_LEVEL;
        }
        self
    }
}

fn default_star_level() -> u32 {
    BASE_STAR_LEVEL
}

fn star_level_or_base<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(BASE_STAR_LEVEL))
}
