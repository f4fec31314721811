use crate::task::Task;

/// Completion summary for a set of tasks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WeekStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Rounded to the nearest integer, half up. Zero when there are no tasks.
    pub completed_pct: u32,
}

impl WeekStats {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let (total, completed) = tasks
            .into_iter()
            .fold((0usize, 0usize), |(total, completed), task| {
                (total + 1, completed + usize::from(task.completed))
            });
        let completed_pct = if total == 0 {
            0
        } else {
            ((200 * completed + total) / (2 * total)) as u32
        };
        Self {
            total,
            completed,
            pending: total - completed,
            completed_pct,
        }
    }
}
