//! Task reward state machine.
//!
//! The only entry point that flips task status or the reward latch.

use crate::model::economy::{
    EconomyState, INCUBATION_COMPLETE, INCUBATION_STEP, TASK_REWARD_CURRENCY,
};
use crate::model::task::{Task, TaskStatus};

/// Balances actually credited by one completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardGrant {
    pub currency: u32,
    /// Progress gained after clamping; 0 when the egg was already full.
    pub incubation_progress: u8,
}

/// Result of one toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub status: TaskStatus,
    /// Present only on the first completion of the task.
    pub reward: Option<RewardGrant>,
}

/// Flips `task` between pending and done, crediting `economy` at most once
/// per task lifetime.
///
/// # Contract
/// - `Pending -> Done`: sets `completed_at = now`; if the latch is clear,
///   credits one ticket and one incubation step (clamped) and sets the latch.
/// - `Done -> Pending`: clears `completed_at`; the latch stays set.
pub fn toggle_task(task: &mut Task, economy: &mut EconomyState, now: i64) -> ToggleOutcome {
    let status = task.status.toggled();
    task.status = status;

    let reward = match status {
        TaskStatus::Done => {
            task.completed_at = Some(now);
            if task.reward_claimed {
                None
            } else {
                task.reward_claimed = true;
                Some(credit_completion(economy))
            }
        }
        TaskStatus::Pending => {
            task.completed_at = None;
            None
        }
    };

    ToggleOutcome { status, reward }
}

fn credit_completion(economy: &mut EconomyState) -> RewardGrant {
    let before = economy.incubation_progress;
    economy.currency = economy.currency.saturating_add(TASK_REWARD_CURRENCY);
    economy.incubation_progress = before
        .saturating_add(INCUBATION_STEP)
        .min(INCUBATION_COMPLETE);

    RewardGrant {
        currency: TASK_REWARD_CURRENCY,
        incubation_progress: economy.incubation_progress.saturating_sub(before),
    }
}

#[cfg(test)]
mod tests {
    use super::{toggle_task, RewardGrant};
    use crate::model::economy::EconomyState;
    use crate::model::task::{Task, TaskStatus};
    use proptest::prelude::*;

    #[test]
    fn first_completion_credits_once_and_latches() {
        let mut task = Task::new("stretch", 0, 0);
        let mut economy = EconomyState::default();

        let outcome = toggle_task(&mut task, &mut economy, 50);

        assert_eq!(outcome.status, TaskStatus::Done);
        assert_eq!(
            outcome.reward,
            Some(RewardGrant {
                currency: 1,
                incubation_progress: 20
            })
        );
        assert_eq!(economy.currency, 1);
        assert_eq!(economy.incubation_progress, 20);
        assert!(task.reward_claimed());
        assert_eq!(task.completed_at(), Some(50));
    }

    #[test]
    fn reopening_clears_completion_but_keeps_latch() {
        let mut task = Task::new("stretch", 0, 0);
        let mut economy = EconomyState::default();
        toggle_task(&mut task, &mut economy, 50);

        let outcome = toggle_task(&mut task, &mut economy, 60);

        assert_eq!(outcome.status, TaskStatus::Pending);
        assert!(outcome.reward.is_none());
        assert!(task.completed_at().is_none());
        assert!(task.reward_claimed());
        assert!(task.validate().is_ok());
    }

    #[test]
    fn recompletion_flips_status_without_reward() {
        let mut task = Task::new("stretch", 0, 0);
        let mut economy = EconomyState::default();
        toggle_task(&mut task, &mut economy, 1);
        toggle_task(&mut task, &mut economy, 2);

        let outcome = toggle_task(&mut task, &mut economy, 3);

        assert_eq!(outcome.status, TaskStatus::Done);
        assert!(outcome.reward.is_none());
        assert_eq!(task.completed_at(), Some(3));
        assert_eq!(economy.currency, 1);
        assert_eq!(economy.incubation_progress, 20);
    }

    #[test]
    fn progress_clamps_at_full_egg() {
        let mut economy = EconomyState {
            incubation_progress: 90,
            ..EconomyState::default()
        };
        let mut first = Task::new("a", 0, 0);
        let mut second = Task::new("b", 0, 0);

        let grant = toggle_task(&mut first, &mut economy, 0).reward.expect("reward");
        assert_eq!(grant.incubation_progress, 10);
        assert_eq!(economy.incubation_progress, 100);

        let grant = toggle_task(&mut second, &mut economy, 0).reward.expect("reward");
        assert_eq!(grant.incubation_progress, 0);
        assert_eq!(economy.incubation_progress, 100);
        assert_eq!(economy.currency, 2);

        toggle_task(&mut second, &mut economy, 0);
        toggle_task(&mut second, &mut economy, 0);
        assert_eq!(economy.incubation_progress, 100);
        assert_eq!(economy.currency, 2);
    }

    proptest! {
        #[test]
        fn prop_any_number_of_toggles_rewards_exactly_once(toggles in 1usize..64, start in 0u8..=100) {
            let mut task = Task::new("repeat", 0, 0);
            let mut economy = EconomyState {
                incubation_progress: start,
                ..EconomyState::default()
            };
            let mut grants = 0;
            for step in 0..toggles {
                if toggle_task(&mut task, &mut economy, step as i64).reward.is_some() {
                    grants += 1;
                }
            }
            prop_assert_eq!(grants, 1);
            prop_assert_eq!(economy.currency, 1);
            prop_assert_eq!(economy.incubation_progress, start.saturating_add(20).min(100));
            prop_assert!(task.reward_claimed());
        }
    }
}
