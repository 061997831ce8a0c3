//! Task domain model.
//!
//! # Responsibility
//! - Define the task record shown in the task list.
//! - Expose read-only access to the reward latch and completion status.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `reward_claimed` only moves from `false` to `true`.
//! - `status` and `reward_claimed` are mutated only by `engine::reward`.
//! - `completed_at` is set iff `status == TaskStatus::Done`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// Completion state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not completed yet.
    Pending,
    /// Completed; `completed_at` holds the completion time.
    Done,
}

impl TaskStatus {
    /// Returns the opposite status, used by the toggle entry point.
    pub fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Done,
            Self::Done => Self::Pending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
        }
    }
}

/// Task validation failures raised before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Content is empty or whitespace only.
    EmptyContent,
    /// `completed_at` disagrees with `status`.
    CompletionMismatch,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "task content must not be empty"),
            Self::CompletionMismatch => {
                write!(f, "task completion time must be set only for done tasks")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Short user-entered text.
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Unix epoch milliseconds.
    pub due_at: i64,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub(crate) status: TaskStatus,
    #[serde(default)]
    pub(crate) completed_at: Option<i64>,
    /// One-way latch preventing repeated rewards from re-completing a task.
    #[serde(default)]
    pub(crate) reward_claimed: bool,
}

impl Task {
    /// Creates a pending task with a generated stable ID.
    pub fn new(content: impl Into<String>, due_at: i64, created_at: i64) -> Self {
        Self::with_id(Uuid::new_v4(), content, due_at, created_at)
    }

    /// Creates a pending task with a caller-provided ID.
    ///
    /// The reward latch always starts cleared.
    pub fn with_id(id: TaskId, content: impl Into<String>, due_at: i64, created_at: i64) -> Self {
        Self {
            id,
            content: content.into(),
            description: None,
            due_at,
            created_at,
            status: TaskStatus::Pending,
            completed_at: None,
            reward_claimed: false,
        }
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn completed_at(&self) -> Option<i64> {
        self.completed_at
    }

    pub fn reward_claimed(&self) -> bool {
        self.reward_claimed
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Returns whether a pending task is past its due time at `now`.
    pub fn is_overdue(&self, now: i64) -> bool {
        !self.is_done() && self.due_at < now
    }

    /// Realigns `completed_at` with `status` for records written by older
    /// clients. A done task with no completion time is stamped with
    /// `created_at`. Returns whether anything changed.
    pub(crate) fn repair_completion(&mut self) -> bool {
        match (self.status, self.completed_at) {
            (TaskStatus::Done, None) => {
                self.completed_at = Some(self.created_at);
                true
            }
            (TaskStatus::Pending, Some(_)) => {
                self.completed_at = None;
                true
            }
            _ => false,
        }
    }

    /// Validates record-level invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.content.trim().is_empty() {
            return Err(TaskValidationError::EmptyContent);
        }
        if self.is_done() != self.completed_at.is_some() {
            return Err(TaskValidationError::CompletionMismatch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskStatus, TaskValidationError};

    #[test]
    fn new_task_is_pending_and_unclaimed() {
        let task = Task::new("write report", 2_000, 1_000);
        assert_eq!(task.status(), TaskStatus::Pending);
        assert!(!task.reward_claimed());
        assert!(task.completed_at().is_none());
        assert!(task.validate().is_ok());
    }

    #[test]
    fn blank_content_is_rejected() {
        let task = Task::new("   ", 0, 0);
        assert_eq!(task.validate(), Err(TaskValidationError::EmptyContent));
    }

    #[test]
    fn overdue_only_applies_to_pending_tasks() {
        let mut task = Task::new("file taxes", 500, 0);
        assert!(task.is_overdue(501));
        assert!(!task.is_overdue(500));

        task.status = TaskStatus::Done;
        task.completed_at = Some(600);
        assert!(!task.is_overdue(10_000));
    }

    #[test]
    fn legacy_blob_without_latch_defaults_to_unclaimed() {
        let json = r#"{
            "id": "6f1c1a5e-8d0e-4c0b-9a57-3c9a4f7f2d10",
            "content": "legacy",
            "due_at": 10,
            "created_at": 5,
            "status": "pending"
        }"#;
        let task: Task = serde_json::from_str(json).expect("legacy task should parse");
        assert!(!task.reward_claimed());
        assert!(task.description.is_none());
    }

    #[test]
    fn repair_realigns_completion_time_with_status() {
        let mut done = Task::new("legacy done", 0, 70);
        done.status = TaskStatus::Done;
        assert!(done.repair_completion());
        assert_eq!(done.completed_at(), Some(70));
        assert!(done.validate().is_ok());

        let mut pending = Task::new("legacy pending", 0, 0);
        pending.completed_at = Some(5);
        assert!(pending.repair_completion());
        assert!(pending.completed_at().is_none());

        assert!(!pending.repair_completion());
    }
}
