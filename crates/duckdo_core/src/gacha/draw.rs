//! Rarity-weighted draws with a pity guarantee.
//!
//! # Invariants
//! - A draw made with `pity >= PITY_GUARANTEE_THRESHOLD` is always legendary.
//! - Running pity resets to 0 after a legendary result and otherwise grows by 1.
//! - Batch results keep draw order.

use crate::gacha::pool::RewardPool;
use crate::gacha::rng::RandomSource;
use crate::model::collectible::{CollectibleInstance, CollectibleTemplate, RarityTier};

/// Pity value at which the next draw is forced legendary (the 150th draw).
pub const PITY_GUARANTEE_THRESHOLD: u32 = 149;

// Cumulative lower bounds on a `[0, 100)` roll, checked rarest first.
const LEGENDARY_ROLL_FLOOR: f64 = 98.0;
const EPIC_ROLL_FLOOR: f64 = 85.0;
const RARE_ROLL_FLOOR: f64 = 55.0;

/// Resolved tier for one draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierRoll {
    pub tier: RarityTier,
    /// `true` when the pity guarantee forced the tier.
    pub is_guaranteed: bool,
}

/// One drawn collectible plus how its tier was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOutcome {
    pub instance: CollectibleInstance,
    pub tier: RarityTier,
    pub is_guaranteed: bool,
}

/// Ordered results of a multi-draw plus the pity value to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchDraw {
    pub draws: Vec<DrawOutcome>,
    pub ending_pity: u32,
}

impl BatchDraw {
    pub fn instances(&self) -> Vec<CollectibleInstance> {
        self.draws.iter().map(|draw| draw.instance.clone()).collect()
    }
}

/// Maps a uniform roll in `[0, 100)` to a tier: 55/30/13/2 percent.
pub fn tier_for_roll(roll: f64) -> RarityTier {
    if roll > LEGENDARY_ROLL_FLOOR {
        RarityTier::Legendary
    } else if roll > EPIC_ROLL_FLOOR {
        RarityTier::Epic
    } else if roll > RARE_ROLL_FLOOR {
        RarityTier::Rare
    } else {
        RarityTier::Common
    }
}

/// Resolves the tier for a draw made at `pity`.
///
/// The random source is not consumed when the guarantee applies.
pub fn roll_tier(pity: u32, rng: &mut impl RandomSource) -> TierRoll {
    if pity >= PITY_GUARANTEE_THRESHOLD {
        return TierRoll {
            tier: RarityTier::Legendary,
            is_guaranteed: true,
        };
    }
    TierRoll {
        tier: tier_for_roll(rng.next_percent()),
        is_guaranteed: false,
    }
}

/// Pity value after a draw that resolved to `tier`.
pub fn next_pity(pity: u32, tier: RarityTier) -> u32 {
    if tier == RarityTier::Legendary {
        0
    } else {
        pity.saturating_add(1)
    }
}

/// Uniformly picks one template of `tier`.
pub fn sample_template(
    pool: &RewardPool,
    tier: RarityTier,
    rng: &mut impl RandomSource,
) -> &'static CollectibleTemplate {
    pick(&pool.tier_templates(tier), rng)
}

/// Performs one draw at `pity`, stamping the instance with `now`.
pub fn draw(pool: &RewardPool, pity: u32, rng: &mut impl RandomSource, now: i64) -> DrawOutcome {
    let roll = roll_tier(pity, rng);
    let template = sample_template(pool, roll.tier, rng);
    DrawOutcome {
        instance: template.instantiate(now),
        tier: roll.tier,
        is_guaranteed: roll.is_guaranteed,
    }
}

/// Performs `count` sequential draws, threading pity between them.
pub fn draw_batch(
    pool: &RewardPool,
    count: u32,
    starting_pity: u32,
    rng: &mut impl RandomSource,
    now: i64,
) -> BatchDraw {
    let mut pity = starting_pity;
    let mut draws = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let outcome = draw(pool, pity, rng, now);
        pity = next_pity(pity, outcome.tier);
        draws.push(outcome);
    }
    BatchDraw {
        draws,
        ending_pity: pity,
    }
}

/// Hatch draw: uniform over the whole catalog, ignoring rarity and pity.
pub fn draw_uniform(
    pool: &RewardPool,
    rng: &mut impl RandomSource,
    now: i64,
) -> CollectibleInstance {
    let templates: Vec<&'static CollectibleTemplate> = pool.templates().iter().collect();
    pick(&templates, rng).instantiate(now)
}

fn pick(
    candidates: &[&'static CollectibleTemplate],
    rng: &mut impl RandomSource,
) -> &'static CollectibleTemplate {
    // RewardPool guarantees non-empty tiers; clamp guards misbehaving sources.
    let index = rng.pick_index(candidates.len()).min(candidates.len() - 1);
    candidates[index]
}
