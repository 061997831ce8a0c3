use crate::model::task::Task;
use once_cell::sync::Lazy;
use regex::Regex;

static BULLET_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-*]\s*").expect("valid bullet regex"));

const MS_PER_HOUR: i64 = 60 * 60 * 1000;

/// Builds the coach prompt from the current task list.
pub fn coach_prompt(tasks: &[Task], user_name: &str, now: i64) -> String {
    let summary = tasks
        .iter()
        .map(|task| format!("- {} ({})", task.content, due_label(task, now)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a cheerful, energetic duck productivity coach named \"Quack Coach\".\n\
         The user {user_name} has the following tasks:\n\
         {summary}\n\n\
         Give a short, motivating message (under 50 words).\n\
         If they have many tasks, prioritize one.\n\
         If they have no tasks, tell them to relax or plan ahead.\n\
         Use duck puns occasionally."
    )
}

/// Builds the prompt asking for 3-5 sub-steps of one task.
pub fn subtask_prompt(task_text: &str) -> String {
    format!(
        "Break down the task \"{task_text}\" into 3-5 smaller, actionable sub-steps.\n\
         Return ONLY the list of steps, one per line. No numbering."
    )
}

/// Splits provider output into steps, dropping blank lines and bullets.
pub fn parse_subtask_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| BULLET_PREFIX_RE.replace(line, "").into_owned())
        .collect()
}

fn due_label(task: &Task, now: i64) -> String {
    if task.is_done() {
        return "done".to_string();
    }
    if task.is_overdue(now) {
        return "pending, overdue".to_string();
    }
    let hours = task.due_at.saturating_sub(now) / MS_PER_HOUR;
    format!("pending, due in {hours}h")
}

#[cfg(test)]
mod tests {
    use super::{coach_prompt, parse_subtask_lines};
    use crate::model::task::Task;

    #[test]
    fn strips_bullets_and_blank_lines() {
        let steps = parse_subtask_lines("- Gather receipts\n\n* Fill the form\n  Submit online  \n");
        assert_eq!(steps, vec!["Gather receipts", "Fill the form", "Submit online"]);
    }

    #[test]
    fn coach_prompt_lists_tasks_with_due_labels() {
        let hour = 60 * 60 * 1000;
        let tasks = vec![
            Task::new("Laundry", 3 * hour, 0),
            Task::new("Call mom", 0, 0),
        ];
        let prompt = coach_prompt(&tasks, "Mallard", hour);
        assert!(prompt.contains("The user Mallard has"));
        assert!(prompt.contains("- Laundry (pending, due in 2h)"));
        assert!(prompt.contains("- Call mom (pending, overdue)"));
    }

    #[test]
    fn far_future_due_time_does_not_overflow() {
        let tasks = vec![Task::new("Someday", i64::MAX, 0)];
        let prompt = coach_prompt(&tasks, "Mallard", i64::MIN);
        assert!(prompt.contains("- Someday (pending, due in 2562047788015h)"));
    }
}
