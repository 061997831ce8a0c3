//! Per-user session: the user-facing operations of the task tracker.
//!
//! # Responsibility
//! - Expose create/edit/describe/delete/toggle for tasks and draw/hatch for
//!   rewards.
//! - Persist every successful transition through `UserDataRepository`.
//!
//! # Invariants
//! - Refused operations write nothing.
//! - The reward latch is only changed through `engine::reward::toggle_task`.
//! - Writes that grant value are ordered so an interrupted save can lose a
//!   reward but never duplicate one.

use crate::clock::Clock;
use crate::engine::error::EconomyError;
use crate::engine::hatch::{hatch, HatchOutcome};
use crate::engine::purchase::{purchase_draw, DrawPurchase};
use crate::engine::reward::{toggle_task, ToggleOutcome};
use crate::gacha::pool::RewardPool;
use crate::gacha::rng::RandomSource;
use crate::model::collectible::CollectibleInstance;
use crate::model::economy::EconomyState;
use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::repo::user_repo::{RepoError, UserDataRepository};
use crate::service::task_query::{apply_query, TaskQuery};
use crate::store::KvStore;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Phrase a user must type to delete a task. Compared case-insensitively.
pub const DELETE_CONFIRMATION_PHRASE: &str = "okay";

/// Session operation errors.
#[derive(Debug)]
pub enum SessionError {
    Validation(TaskValidationError),
    TaskNotFound(TaskId),
    /// Delete confirmation did not match `DELETE_CONFIRMATION_PHRASE`.
    ConfirmationMismatch,
    Economy(EconomyError),
    Repo(RepoError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::ConfirmationMismatch => write!(
                f,
                "type `{DELETE_CONFIRMATION_PHRASE}` to confirm deleting this task"
            ),
            Self::Economy(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Economy(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::TaskNotFound(_) | Self::ConfirmationMismatch => None,
        }
    }
}

impl From<TaskValidationError> for SessionError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<EconomyError> for SessionError {
    fn from(value: EconomyError) -> Self {
        Self::Economy(value)
    }
}

impl From<RepoError> for SessionError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Result of toggling one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskToggle {
    pub task: Task,
    pub outcome: ToggleOutcome,
    pub economy: EconomyState,
}

/// One user's session over a key-value store.
pub struct DuckSession<S: KvStore, R: RandomSource, C: Clock> {
    repo: UserDataRepository<S>,
    pool: RewardPool,
    rng: R,
    clock: C,
}

impl<S: KvStore, R: RandomSource, C: Clock> DuckSession<S, R, C> {
    /// Opens a session using the standard reward pool.
    pub fn new(store: S, user_id: impl Into<String>, rng: R, clock: C) -> Self {
        Self::with_pool(store, user_id, RewardPool::standard(), rng, clock)
    }

    pub fn with_pool(
        store: S,
        user_id: impl Into<String>,
        pool: RewardPool,
        rng: R,
        clock: C,
    ) -> Self {
        Self {
            repo: UserDataRepository::new(store, user_id),
            pool,
            rng,
            clock,
        }
    }

    pub fn user_id(&self) -> &str {
        self.repo.user_id()
    }

    pub fn pool(&self) -> &RewardPool {
        &self.pool
    }

    pub fn economy(&self) -> SessionResult<EconomyState> {
        Ok(self.repo.load_economy()?)
    }

    pub fn tasks(&self) -> SessionResult<Vec<Task>> {
        Ok(self.repo.load_tasks()?)
    }

    pub fn collection(&self) -> SessionResult<Vec<CollectibleInstance>> {
        Ok(self.repo.load_collection()?)
    }

    pub fn list_tasks(&self, query: &TaskQuery) -> SessionResult<Vec<Task>> {
        Ok(apply_query(&self.repo.load_tasks()?, query))
    }

    /// Creates a pending task; `due_at` defaults to now.
    pub fn create_task(
        &mut self,
        content: impl Into<String>,
        due_at: Option<i64>,
    ) -> SessionResult<Task> {
        let now = self.clock.now_ms();
        let task = Task::new(content, due_at.unwrap_or(now), now);
        task.validate()?;

        let mut tasks = self.repo.load_tasks()?;
        tasks.push(task.clone());
        self.repo.save_tasks(&tasks)?;

        info!(
            "event=task_create module=session status=ok task_id={} total={}",
            task.id,
            tasks.len()
        );
        Ok(task)
    }

    /// Replaces content, and the due time when one is given.
    pub fn edit_task(
        &mut self,
        id: TaskId,
        content: impl Into<String>,
        due_at: Option<i64>,
    ) -> SessionResult<Task> {
        let mut tasks = self.repo.load_tasks()?;
        let task = find_task_mut(&mut tasks, id)?;

        let mut edited = task.clone();
        edited.content = content.into();
        if let Some(due_at) = due_at {
            edited.due_at = due_at;
        }
        edited.validate()?;
        *task = edited.clone();

        self.repo.save_tasks(&tasks)?;
        info!("event=task_edit module=session status=ok task_id={id}");
        Ok(edited)
    }

    /// Sets or clears the free-form notes shown under a task.
    /// Blank text clears the description.
    pub fn describe_task(
        &mut self,
        id: TaskId,
        description: Option<String>,
    ) -> SessionResult<Task> {
        let mut tasks = self.repo.load_tasks()?;
        let task = find_task_mut(&mut tasks, id)?;
        task.description = description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        let described = task.clone();

        self.repo.save_tasks(&tasks)?;
        info!(
            "event=task_describe module=session status=ok task_id={id} has_description={}",
            described.description.is_some()
        );
        Ok(described)
    }

    /// Deletes a task once the confirmation phrase matches.
    pub fn delete_task(&mut self, id: TaskId, confirmation: &str) -> SessionResult<Task> {
        if !confirmation.eq_ignore_ascii_case(DELETE_CONFIRMATION_PHRASE) {
            warn!("event=task_delete module=session status=rejected task_id={id} error_code=confirmation_mismatch");
            return Err(SessionError::ConfirmationMismatch);
        }

        let mut tasks = self.repo.load_tasks()?;
        let index = tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(SessionError::TaskNotFound(id))?;
        let removed = tasks.remove(index);

        self.repo.save_tasks(&tasks)?;
        info!("event=task_delete module=session status=ok task_id={id}");
        Ok(removed)
    }

    /// Flips a task between pending and done, crediting the first completion.
    pub fn toggle_task_status(&mut self, id: TaskId) -> SessionResult<TaskToggle> {
        let now = self.clock.now_ms();
        let mut tasks = self.repo.load_tasks()?;
        let mut economy = self.repo.load_economy()?;

        let task = find_task_mut(&mut tasks, id)?;
        let outcome = toggle_task(task, &mut economy, now);
        let task = task.clone();

        // Latch first: a lost economy write forfeits the reward instead of
        // leaving the task claimable again.
        self.repo.save_tasks(&tasks)?;
        if outcome.reward.is_some() {
            self.repo.save_economy(&economy)?;
        }

        info!(
            "event=task_toggle module=session status=ok task_id={id} new_status={} rewarded={} currency={} incubation={}",
            outcome.status.as_str(),
            outcome.reward.is_some(),
            economy.currency,
            economy.incubation_progress
        );
        Ok(TaskToggle {
            task,
            outcome,
            economy,
        })
    }

    /// Spends `count` tickets on draws and merges the results.
    pub fn purchase_draw(&mut self, count: u32) -> SessionResult<DrawPurchase> {
        let now = self.clock.now_ms();
        let economy = self.repo.load_economy()?;
        let collection = self.repo.load_collection()?;

        let purchase = purchase_draw(&self.pool, &economy, &collection, count, &mut self.rng, now)
            .map_err(|err| {
                warn!(
                    "event=draw_purchase module=session status=rejected count={count} error_code={}",
                    err.code()
                );
                err
            })?;

        // Debit first: a lost collection write forfeits draws instead of
        // granting free ones.
        self.repo.save_economy(&purchase.economy)?;
        self.repo.save_collection(&purchase.collection)?;

        let guaranteed = purchase.draws.iter().filter(|d| d.is_guaranteed).count();
        let tiers = purchase
            .draws
            .iter()
            .map(|d| d.tier.as_str())
            .collect::<Vec<_>>()
            .join(",");
        info!(
            "event=draw_purchase module=session status=ok count={count} tiers={tiers} guaranteed={guaranteed} pity={} currency={}",
            purchase.economy.pity_counter,
            purchase.economy.currency
        );
        Ok(purchase)
    }

    /// Hatches a full egg.
    pub fn hatch(&mut self) -> SessionResult<HatchOutcome> {
        let now = self.clock.now_ms();
        let economy = self.repo.load_economy()?;
        let collection = self.repo.load_collection()?;

        let outcome = hatch(&self.pool, &economy, &collection, &mut self.rng, now).map_err(|err| {
            warn!(
                "event=hatch module=session status=rejected error_code={} progress={}",
                err.code(),
                economy.incubation_progress
            );
            err
        })?;

        self.repo.save_economy(&outcome.economy)?;
        self.repo.save_collection(&outcome.collection)?;

        info!(
            "event=hatch module=session status=ok tier={} new={} hatched_total={}",
            outcome.instance.rarity.as_str(),
            outcome.merge.is_new(),
            outcome.economy.incubation_count
        );
        Ok(outcome)
    }
}

fn find_task_mut(tasks: &mut [Task], id: TaskId) -> SessionResult<&mut Task> {
    tasks
        .iter_mut()
        .find(|task| task.id == id)
        .ok_or(SessionError::TaskNotFound(id))
}
