//! Task list filtering, search and ordering.

use crate::model::task::{Task, TaskStatus};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSort {
    /// Soonest deadline first.
    #[default]
    DeadlineAsc,
    DeadlineDesc,
    /// Pending before done, then soonest deadline.
    Status,
}

/// List options for the task screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub filter: TaskFilter,
    pub sort: TaskSort,
    /// Case-insensitive substring match on content.
    pub search: Option<String>,
}

/// Returns matching tasks in display order. Ties keep stored order.
pub fn apply_query(tasks: &[Task], query: &TaskQuery) -> Vec<Task> {
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|needle| !needle.is_empty())
        .map(str::to_lowercase);

    let mut matched: Vec<Task> = tasks
        .iter()
        .filter(|task| match query.filter {
            TaskFilter::All => true,
            TaskFilter::Pending => task.status() == TaskStatus::Pending,
            TaskFilter::Done => task.status() == TaskStatus::Done,
        })
        .filter(|task| match &needle {
            Some(needle) => task.content.to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .cloned()
        .collect();

    matched.sort_by(|a, b| compare(a, b, query.sort));
    matched
}

fn compare(a: &Task, b: &Task, sort: TaskSort) -> Ordering {
    match sort {
        TaskSort::DeadlineAsc => a.due_at.cmp(&b.due_at),
        TaskSort::DeadlineDesc => b.due_at.cmp(&a.due_at),
        TaskSort::Status => status_rank(a)
            .cmp(&status_rank(b))
            .then_with(|| a.due_at.cmp(&b.due_at)),
    }
}

fn status_rank(task: &Task) -> u8 {
    match task.status() {
        TaskStatus::Pending => 0,
        TaskStatus::Done => 1,
    }
}
