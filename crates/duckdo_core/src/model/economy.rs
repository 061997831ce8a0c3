//! Per-user economy balances.
//!
//! # Invariants
//! - `incubation_progress` stays within `0..=INCUBATION_COMPLETE`.
//! - `pity_counter` counts draws since the last legendary result.

use super::lenient::null_as_default;
use serde::{Deserialize, Serialize};

/// Progress granted per first-time task completion.
pub const INCUBATION_STEP: u8 = 20;
/// Progress at which an egg can hatch.
pub const INCUBATION_COMPLETE: u8 = 100;
/// Currency granted per first-time task completion.
pub const TASK_REWARD_CURRENCY: u32 = 1;
/// Welcome gift for accounts without persisted balances.
pub const WELCOME_CURRENCY: u32 = 1;

/// Economy balances for one user.
///
/// Every field has a serde default so that blobs written before a field
/// existed (notably `pity_counter`) still load. Explicit `null` reads as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyState {
    /// Draw tickets.
    #[serde(deserialize_with = "null_as_default")]
    pub currency: u32,
    /// Egg progress in percent.
    #[serde(deserialize_with = "null_as_default")]
    pub incubation_progress: u8,
    /// Number of eggs hatched so far.
    #[serde(deserialize_with = "null_as_default")]
    pub incubation_count: u32,
    /// Draws since the last legendary result.
    #[serde(deserialize_with = "null_as_default")]
    pub pity_counter: u32,
}

impl EconomyState {
    /// Balances for a brand-new account.
    pub fn starter() -> Self {
        Self {
            currency: WELCOME_CURRENCY,
            ..Self::default()
        }
    }

    pub fn is_ready_to_hatch(&self) -> bool {
        self.incubation_progress >= INCUBATION_COMPLETE
    }

    pub(crate) fn normalize(mut self) -> Self {
        self.incubation_progress = self.incubation_progress.min(INCUBATION_COMPLETE);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::EconomyState;

    #[test]
    fn starter_has_welcome_ticket() {
        let state = EconomyState::starter();
        assert_eq!(state.currency, 1);
        assert_eq!(state.incubation_progress, 0);
        assert_eq!(state.pity_counter, 0);
    }

    #[test]
    fn legacy_blob_without_pity_counter_defaults_to_zero() {
        let state: EconomyState =
            serde_json::from_str(r#"{"currency":4,"incubation_progress":60,"incubation_count":2}"#)
                .expect("parse");
        assert_eq!(state.pity_counter, 0);
        assert_eq!(state.currency, 4);
    }

    #[test]
    fn null_fields_read_as_zero() {
        let state: EconomyState = serde_json::from_str(
            r#"{"currency":2,"incubation_progress":null,"incubation_count":1,"pity_counter":null}"#,
        )
        .expect("parse");
        assert_eq!(state.pity_counter, 0);
        assert_eq!(state.incubation_progress, 0);
        assert_eq!(state.currency, 2);
    }

    #[test]
    fn normalize_clamps_progress() {
        let state = EconomyState {
            incubation_progress: 140,
            ..EconomyState::default()
        };
        assert_eq!(state.normalize().incubation_progress, 100);
        assert!(state.normalize().is_ready_to_hatch());
    }
}
