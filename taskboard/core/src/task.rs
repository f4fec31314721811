use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Urgency of a task. Anything outside these three values is rejected by the store.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown priority '{0}', expected one of Low, Medium, High")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

/// A single scheduled to-do item as it travels over the wire.
///
/// `created_at` and `updated_at` are assigned by the store and are absent on
/// records that only ever existed on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub datetime: DateTime<Utc>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Builds a record that has not been acknowledged by the server, using a
    /// locally generated identifier.
    pub fn local(draft: TaskDraft) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            datetime: draft.datetime,
            priority: draft.priority,
            completed: false,
            created_at: None,
            updated_at: None,
        }
    }

    /// Overwrites the user-editable fields with the ones from `draft`.
    /// `completed` and the store timestamps are left alone.
    pub fn apply_draft(&mut self, draft: &TaskDraft) {
        self.title = draft.title.clone();
        self.description = draft.description.clone();
        self.datetime = draft.datetime;
        self.priority = draft.priority;
    }
}

/// Body of a create or replace request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub datetime: DateTime<Utc>,
    #[serde(default)]
    pub priority: Priority,
}

/// Partial update. Only the fields that are `Some` are sent and applied.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }

    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(datetime) = self.datetime {
            task.datetime = datetime;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

/// Filters accepted by the list operation.
///
/// The time range is inclusive at `start` and exclusive at `end`.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct TaskQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

impl TaskQuery {
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            q: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_task() -> Task {
        Task {
            id: "abc".to_string(),
            title: "Pay rent".to_string(),
            description: String::new(),
            datetime: Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap(),
            priority: Priority::High,
            completed: false,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn deserializes_task_with_defaults() {
        let json = r#"{"id":"1","title":"Pay rent","datetime":"2024-06-03T09:00:00Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.description, "");
        assert_eq!(task.priority, Priority::Low);
        assert!(!task.completed);
        assert_eq!(task.created_at, None);
    }

    #[test]
    fn rejects_unknown_priority() {
        let json = r#"{"id":"1","title":"x","datetime":"2024-06-03T09:00:00Z","priority":"Urgent"}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }

    #[test]
    fn reads_store_timestamps_in_camel_case() {
        let json = r#"{"id":"1","title":"x","datetime":"2024-06-03T09:00:00Z","createdAt":"2024-06-01T00:00:00Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(
            task.created_at,
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn patch_serializes_only_given_fields() {
        let patch = TaskPatch::completed(true);
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"completed":true}"#);
    }

    #[test]
    fn patch_leaves_unspecified_fields_untouched() {
        let mut task = sample_task();
        let before = task.clone();

        TaskPatch::completed(true).apply_to(&mut task);

        assert!(task.completed);
        assert_eq!(task.title, before.title);
        assert_eq!(task.datetime, before.datetime);
        assert_eq!(task.priority, before.priority);
    }

    #[test]
    fn applying_a_draft_keeps_completion() {
        let mut task = sample_task();
        task.completed = true;
        let draft = TaskDraft {
            title: "Pay rent early".to_string(),
            description: "before the 1st".to_string(),
            datetime: Utc.with_ymd_and_hms(2024, 6, 4, 8, 0, 0).unwrap(),
            priority: Priority::Medium,
        };

        task.apply_draft(&draft);

        assert_eq!(task.title, "Pay rent early");
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.completed);
    }

    #[test]
    fn parses_priority_case_insensitively() {
        assert_eq!("high".parse::<Priority>(), Ok(Priority::High));
        assert_eq!(" Medium ".parse::<Priority>(), Ok(Priority::Medium));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn query_omits_missing_bounds() {
        let query = TaskQuery {
            q: Some("rent".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value, serde_json::json!({"q": "rent"}));
    }
}
