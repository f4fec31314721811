use crate::entities::task::{self, Priority};
use chrono::{DateTime, Utc};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr, SimpleExpr};
use sea_orm::*;
use std::sync::Arc;

pub mod api;

#[derive(Clone, Debug)]
pub struct TaskState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// Error type for TaskService operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// No task is stored under the given ID.
    #[error("Task with ID {0} not found")]
    NotFound(String),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Filters for listing tasks.
#[derive(Debug, Default, Clone)]
pub struct TaskFilter {
    /// Inclusive lower bound on `datetime`. Only applied together with `end`.
    pub start: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `datetime`. Only applied together with `start`.
    pub end: Option<DateTime<Utc>>,
    /// Case-insensitive literal substring matched against title or description.
    pub q: Option<String>,
}

/// Fields required to store a new task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub datetime: DateTime<Utc>,
    pub priority: Priority,
}

/// Fields to overwrite on an existing task. `None` keeps the stored value.
#[derive(Debug, Default, Clone)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub datetime: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

pub struct TaskService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TaskService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TaskService<'_> {
        TaskService { db }
    }

    /// Retrieves tasks matching the filter, ordered by `datetime` ascending.
    ///
    /// # Arguments
    ///
    /// * `filter` - Optional time range and text filter.
    ///
    /// # Returns
    ///
    /// A `Result` containing the matching tasks if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<task::Model>, TaskServiceError> {
        let mut select = task::Entity::find();
        if let (Some(start), Some(end)) = (filter.start, filter.end) {
            select = select
                .filter(task::Column::Datetime.gte(start))
                .filter(task::Column::Datetime.lt(end));
        }
        if let Some(q) = filter.q.as_deref().filter(|q| !q.is_empty()) {
            let pattern = format!("%{}%", escape_like(&q.to_lowercase()));
            select = select.filter(
                Condition::any()
                    .add(lower_like(task::Column::Title, &pattern))
                    .add(lower_like(task::Column::Description, &pattern)),
            );
        }
        let tasks = select
            .order_by_asc(task::Column::Datetime)
            .all(self.db)
            .await?;
        Ok(tasks)
    }

    /// Retrieves a task by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the task to retrieve.
    ///
    /// # Returns
    ///
    /// A `Result` containing the task if found, or `NotFound` otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn get_task_by_id(&self, id: &str) -> Result<task::Model, TaskServiceError> {
        task::Entity::find_by_id(id.to_string())
            .one(self.db)
            .await?
            .ok_or_else(|| TaskServiceError::NotFound(id.to_string()))
    }

    /// Creates a new task. The store assigns the ID and both timestamps;
    /// new tasks start out not completed.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(&self, new_task: NewTask) -> Result<task::Model, TaskServiceError> {
        let now = Utc::now();
        let active_model = task::ActiveModel {
            id: ActiveValue::Set(uuid::Uuid::new_v4().to_string()),
            title: ActiveValue::Set(new_task.title),
            description: ActiveValue::Set(new_task.description),
            datetime: ActiveValue::Set(new_task.datetime),
            priority: ActiveValue::Set(new_task.priority),
            completed: ActiveValue::Set(false),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        let created = active_model.insert(self.db).await?;
        tracing::info!("Created task {}", created.id);
        Ok(created)
    }

    /// Overwrites the supplied fields of a task and refreshes `updated_at`.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the task to update.
    /// * `changes` - Fields to overwrite; unspecified fields keep their stored values.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated task if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn update_task_by_id(
        &self,
        id: &str,
        changes: TaskChanges,
    ) -> Result<task::Model, TaskServiceError> {
        let existing = self.get_task_by_id(id).await?;

        let mut active_model: task::ActiveModel = existing.into();
        if let Some(title) = changes.title {
            active_model.title = ActiveValue::Set(title);
        }
        if let Some(description) = changes.description {
            active_model.description = ActiveValue::Set(description);
        }
        if let Some(datetime) = changes.datetime {
            active_model.datetime = ActiveValue::Set(datetime);
        }
        if let Some(priority) = changes.priority {
            active_model.priority = ActiveValue::Set(priority);
        }
        if let Some(completed) = changes.completed {
            active_model.completed = ActiveValue::Set(completed);
        }
        active_model.updated_at = ActiveValue::Set(Utc::now());

        let updated = active_model.update(self.db).await?;
        Ok(updated)
    }

    /// Deletes a task by its ID.
    ///
    /// # Returns
    ///
    /// A `Result` containing the deleted task if successful, or `NotFound` otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task_by_id(&self, id: &str) -> Result<task::Model, TaskServiceError> {
        let existing = self.get_task_by_id(id).await?;
        task::Entity::delete_by_id(id.to_string())
            .exec(self.db)
            .await?;
        tracing::info!("Deleted task {}", id);
        Ok(existing)
    }
}

fn lower_like(column: task::Column, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

/// Escapes LIKE wildcards so the query matches as a literal substring.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
