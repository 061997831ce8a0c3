//! Collection merge and star upgrades.
//!
//! # Invariants
//! - Names stay unique within the merged collection.
//! - An upgrade keeps the existing entry's `id` and `acquired_at`.
//! - New entries are prepended in incoming order, so the newest is first.
//! - Merging the same batch twice upgrades twice; calls are not idempotent.

use crate::model::collectible::{CollectibleInstance, BASE_STAR_LEVEL};

/// What happened to one incoming item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No entry had this name; inserted at base level.
    Added,
    /// An entry with this name was upgraded to `star_level`.
    Upgraded { star_level: u32 },
}

impl MergeOutcome {
    pub fn is_new(self) -> bool {
        matches!(self, Self::Added)
    }
}

/// Merged collection plus one outcome per incoming item, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    pub collection: Vec<CollectibleInstance>,
    pub outcomes: Vec<MergeOutcome>,
}

/// Merges `incoming` into `existing`, strictly in incoming order.
pub fn merge_collection(
    existing: Vec<CollectibleInstance>,
    incoming: impl IntoIterator<Item = CollectibleInstance>,
) -> MergeResult {
    let mut collection = existing;
    let mut outcomes = Vec::new();

    for mut item in incoming {
        match collection.iter_mut().find(|entry| entry.name == item.name) {
            Some(entry) => {
                entry.star_level = entry.star_level.max(BASE_STAR_LEVEL).saturating_add(1);
                outcomes.push(MergeOutcome::Upgraded {
                    star_level: entry.star_level,
                });
            }
            None => {
                item.star_level = BASE_STAR_LEVEL;
                collection.insert(0, item);
                outcomes.push(MergeOutcome::Added);
            }
        }
    }

    MergeResult {
        collection,
        outcomes,
    }
}

/// Summary numbers for the collection screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollectionStats {
    /// Distinct names owned.
    pub distinct: usize,
    /// Sum of star levels, i.e. total copies acquired.
    pub total_stars: u32,
}

pub fn collection_stats(collection: &[CollectibleInstance]) -> CollectionStats {
    CollectionStats {
        distinct: collection.len(),
        total_stars: collection
            .iter()
            .fold(0u32, |total, entry| total.saturating_add(entry.star_level)),
    }
}
