//! Egg hatching.

use crate::engine::error::EconomyError;
use crate::gacha::draw::draw_uniform;
use crate::gacha::merge::{merge_collection, MergeOutcome};
use crate::gacha::pool::RewardPool;
use crate::gacha::rng::RandomSource;
use crate::model::collectible::CollectibleInstance;
use crate::model::economy::EconomyState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HatchOutcome {
    /// The hatched instance as drawn, before merging.
    pub instance: CollectibleInstance,
    pub merge: MergeOutcome,
    pub economy: EconomyState,
    pub collection: Vec<CollectibleInstance>,
}

/// Hatches a full egg into one collectible.
///
/// # Contract
/// - Requires `incubation_progress >= 100`; otherwise refused.
/// - Template is uniform over the whole catalog; pity is neither read nor
///   written.
/// - Resets progress to 0 and increments `incubation_count`.
pub fn hatch(
    pool: &RewardPool,
    economy: &EconomyState,
    collection: &[CollectibleInstance],
    rng: &mut impl RandomSource,
    now: i64,
) -> Result<HatchOutcome, EconomyError> {
    if !economy.is_ready_to_hatch() {
        return Err(EconomyError::IncubationIncomplete {
            progress: economy.incubation_progress,
        });
    }

    let instance = draw_uniform(pool, rng, now);
    let mut merged = merge_collection(collection.to_vec(), [instance.clone()]);
    let merge = merged.outcomes.pop().unwrap_or(MergeOutcome::Added);

    let mut next_economy = *economy;
    next_economy.incubation_progress = 0;
    next_economy.incubation_count = next_economy.incubation_count.saturating_add(1);

    Ok(HatchOutcome {
        instance,
        merge,
        economy: next_economy,
        collection: merged.collection,
    })
}

#[cfg(test)]
mod tests {
    use super::hatch;
    use crate::engine::error::EconomyError;
    use crate::gacha::pool::RewardPool;
    use crate::gacha::rng::StdRandomSource;
    use crate::model::economy::EconomyState;

    #[test]
    fn full_egg_hatches_and_resets_progress() {
        let economy = EconomyState {
            currency: 2,
            incubation_progress: 100,
            incubation_count: 3,
            pity_counter: 40,
        };
        let mut rng = StdRandomSource::from_seed(5);

        let outcome = hatch(&RewardPool::standard(), &economy, &[], &mut rng, 77).expect("hatch");

        assert_eq!(outcome.economy.incubation_progress, 0);
        assert_eq!(outcome.economy.incubation_count, 4);
        assert_eq!(outcome.economy.pity_counter, 40);
        assert_eq!(outcome.economy.currency, 2);
        assert_eq!(outcome.collection.len(), 1);
        assert!(outcome.merge.is_new());
        assert_eq!(outcome.instance.acquired_at, 77);
    }

    #[test]
    fn partial_egg_is_refused() {
        let economy = EconomyState {
            incubation_progress: 40,
            ..EconomyState::default()
        };
        let mut rng = StdRandomSource::from_seed(5);

        let err = hatch(&RewardPool::standard(), &economy, &[], &mut rng, 0).unwrap_err();

        assert_eq!(err, EconomyError::IncubationIncomplete { progress: 40 });
    }
}
