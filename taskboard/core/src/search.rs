use crate::task::Task;

/// Outcome of the search overlay.
///
/// `NotSearched` is the "type to search" state for a blank query and is
/// distinct from a query that matched nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResults {
    NotSearched,
    Matches(Vec<Task>),
}

impl SearchResults {
    /// Searches every task in `tasks`, regardless of week or selected day.
    pub fn find(tasks: &[Task], query: &str) -> Self {
        match normalize_query(query) {
            None => SearchResults::NotSearched,
            Some(needle) => SearchResults::Matches(
                tasks
                    .iter()
                    .filter(|task| matches_needle(task, &needle))
                    .cloned()
                    .collect(),
            ),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        match self {
            SearchResults::NotSearched => &[],
            SearchResults::Matches(tasks) => tasks,
        }
    }
}

/// Lowercased, trimmed needle, or `None` when there is nothing to search for.
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Case-insensitive substring match of an already normalized needle against
/// title or description.
pub fn matches_needle(task: &Task, needle: &str) -> bool {
    task.title.to_lowercase().contains(needle) || task.description.to_lowercase().contains(needle)
}
