//! Draw purchase: currency debit, batch draw, merge.

use crate::engine::error::EconomyError;
use crate::gacha::draw::draw_batch;
use crate::gacha::merge::{merge_collection, MergeOutcome};
use crate::gacha::pool::RewardPool;
use crate::gacha::rng::RandomSource;
use crate::model::collectible::{CollectibleInstance, RarityTier};
use crate::model::economy::EconomyState;

/// Currency cost of a single draw.
pub const DRAW_COST: u32 = 1;

/// One revealed draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawnItem {
    pub instance: CollectibleInstance,
    pub tier: RarityTier,
    pub is_guaranteed: bool,
    pub merge: MergeOutcome,
}

impl DrawnItem {
    pub fn is_new(&self) -> bool {
        self.merge.is_new()
    }
}

/// Post-purchase state, revealed to the caller as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawPurchase {
    pub economy: EconomyState,
    pub collection: Vec<CollectibleInstance>,
    /// Draws in draw order.
    pub draws: Vec<DrawnItem>,
    pub currency_spent: u32,
}

/// Buys `count` draws.
///
/// The full cost is checked before any draw runs; on refusal nothing is
/// drawn and the inputs stay as they were.
pub fn purchase_draw(
    pool: &RewardPool,
    economy: &EconomyState,
    collection: &[CollectibleInstance],
    count: u32,
    rng: &mut impl RandomSource,
    now: i64,
) -> Result<DrawPurchase, EconomyError> {
    if count == 0 {
        return Err(EconomyError::InvalidDrawCount(count));
    }
    let required = count.saturating_mul(DRAW_COST);
    if economy.currency < required {
        return Err(EconomyError::InsufficientCurrency {
            required,
            available: economy.currency,
        });
    }

    let mut next_economy = *economy;
    next_economy.currency -= required;

    let batch = draw_batch(pool, count, economy.pity_counter, rng, now);
    next_economy.pity_counter = batch.ending_pity;

    let merged = merge_collection(collection.to_vec(), batch.instances());
    let draws = batch
        .draws
        .into_iter()
        .zip(merged.outcomes)
        .map(|(draw, merge)| DrawnItem {
            instance: draw.instance,
            tier: draw.tier,
            is_guaranteed: draw.is_guaranteed,
            merge,
        })
        .collect();

    Ok(DrawPurchase {
        economy: next_economy,
        collection: merged.collection,
        draws,
        currency_spent: required,
    })
}

#[cfg(test)]
mod tests {
    use super::purchase_draw;
    use crate::engine::error::EconomyError;
    use crate::gacha::pool::RewardPool;
    use crate::gacha::rng::StdRandomSource;
    use crate::model::collectible::RarityTier;
    use crate::model::economy::EconomyState;

    #[test]
    fn insufficient_currency_refuses_whole_batch() {
        let economy = EconomyState {
            currency: 5,
            pity_counter: 12,
            ..EconomyState::default()
        };
        let mut rng = StdRandomSource::from_seed(1);

        let err = purchase_draw(&RewardPool::standard(), &economy, &[], 10, &mut rng, 0)
            .unwrap_err();

        assert_eq!(
            err,
            EconomyError::InsufficientCurrency {
                required: 10,
                available: 5
            }
        );
        assert_eq!(economy.currency, 5);
        assert_eq!(economy.pity_counter, 12);
    }

    #[test]
    fn zero_draws_is_rejected() {
        let economy = EconomyState {
            currency: 3,
            ..EconomyState::default()
        };
        let mut rng = StdRandomSource::from_seed(1);
        let err = purchase_draw(&RewardPool::standard(), &economy, &[], 0, &mut rng, 0)
            .unwrap_err();
        assert_eq!(err, EconomyError::InvalidDrawCount(0));
    }

    #[test]
    fn purchase_debits_and_persists_ending_pity() {
        let economy = EconomyState {
            currency: 10,
            pity_counter: 149,
            ..EconomyState::default()
        };
        let mut rng = StdRandomSource::from_seed(99);

        let purchase =
            purchase_draw(&RewardPool::standard(), &economy, &[], 10, &mut rng, 5).expect("draw");

        assert_eq!(purchase.currency_spent, 10);
        assert_eq!(purchase.economy.currency, 0);
        assert_eq!(purchase.draws.len(), 10);
        assert_eq!(purchase.draws[0].tier, RarityTier::Legendary);
        assert!(purchase.draws[0].is_guaranteed);
        assert!(purchase.draws[0].is_new());

        let last_legendary = purchase
            .draws
            .iter()
            .rposition(|draw| draw.tier == RarityTier::Legendary)
            .expect("first draw is legendary");
        let expected_pity = (purchase.draws.len() - 1 - last_legendary) as u32;
        assert_eq!(purchase.economy.pity_counter, expected_pity);

        let total_stars: u32 = purchase.collection.iter().map(|c| c.star_level).sum();
        assert_eq!(total_stars, 10);
    }
}
