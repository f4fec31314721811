use crate::entities::task::{self, Priority};
use crate::task::{NewTask, TaskChanges, TaskFilter, TaskService, TaskServiceError, TaskState};
use axum::{
    Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

/// JSON representation of a Task for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskJson {
    /// Identifier assigned by the store
    id: String,
    title: String,
    description: String,
    /// Scheduled date and start time
    datetime: DateTime<Utc>,
    priority: Priority,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<task::Model> for TaskJson {
    fn from(model: task::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            datetime: model.datetime,
            priority: model.priority,
            completed: model.completed,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Request body for creating a task.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    title: String,
    #[serde(default)]
    description: String,
    datetime: DateTime<Utc>,
    #[serde(default)]
    priority: Priority,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(request: CreateTaskRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            datetime: request.datetime,
            priority: request.priority,
        }
    }
}

/// Request body for replacing a task. Optional fields that are left out keep
/// their stored values.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplaceTaskRequest {
    title: String,
    datetime: DateTime<Utc>,
    description: Option<String>,
    priority: Option<Priority>,
    completed: Option<bool>,
}

impl From<ReplaceTaskRequest> for TaskChanges {
    fn from(request: ReplaceTaskRequest) -> Self {
        Self {
            title: Some(request.title),
            description: request.description,
            datetime: Some(request.datetime),
            priority: request.priority,
            completed: request.completed,
        }
    }
}

/// Request body for a partial update.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PatchTaskRequest {
    title: Option<String>,
    description: Option<String>,
    datetime: Option<DateTime<Utc>>,
    priority: Option<Priority>,
    completed: Option<bool>,
}

impl From<PatchTaskRequest> for TaskChanges {
    fn from(request: PatchTaskRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            datetime: request.datetime,
            priority: request.priority,
            completed: request.completed,
        }
    }
}

/// Query parameters for listing tasks.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TasksQuery {
    /// Inclusive lower bound, RFC 3339 timestamp or YYYY-MM-DD
    start: Option<String>,
    /// Exclusive upper bound, RFC 3339 timestamp or YYYY-MM-DD
    end: Option<String>,
    /// Case-insensitive text matched against title or description
    q: Option<String>,
}

impl TryFrom<TasksQuery> for TaskFilter {
    type Error = TaskApiError;

    fn try_from(query: TasksQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            start: query.start.as_deref().map(parse_timestamp).transpose()?,
            end: query.end.as_deref().map(parse_timestamp).transpose()?,
            q: query.q,
        })
    }
}

/// JSON body for API errors.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// JSON body returned after a successful delete.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Errors surfaced by the task endpoints.
#[derive(Debug, thiserror::Error)]
pub enum TaskApiError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),
    #[error("Not found")]
    NotFound,
    /// Store or connection failure.
    #[error("{0}")]
    Internal(String),
}

impl From<TaskServiceError> for TaskApiError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::NotFound(_) => TaskApiError::NotFound,
            TaskServiceError::Database(db_err) => TaskApiError::Internal(db_err.to_string()),
        }
    }
}

impl From<JsonRejection> for TaskApiError {
    fn from(rejection: JsonRejection) -> Self {
        TaskApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for TaskApiError {
    fn from(rejection: QueryRejection) -> Self {
        TaskApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for TaskApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            TaskApiError::Validation(_) => StatusCode::BAD_REQUEST,
            TaskApiError::NotFound => StatusCode::NOT_FOUND,
            TaskApiError::Internal(message) => {
                tracing::error!("Task request failed: {}", message);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

fn require_title(title: &str) -> Result<(), TaskApiError> {
    if title.trim().is_empty() {
        return Err(TaskApiError::Validation("Title is required".to_string()));
    }
    Ok(())
}

/// Accepts an RFC 3339 timestamp or a bare date, read as midnight UTC.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TaskApiError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        })
        .map_err(|_| TaskApiError::Validation(format!("Invalid timestamp '{}'", raw)))
}

/// Handler for GET /api/tasks - Lists tasks, optionally bounded and filtered.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/tasks",
    params(TasksQuery),
    responses(
        (status = 200, description = "Tasks ordered by datetime", body = [TaskJson]),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn list_tasks_handler(
    State(state): State<Arc<TaskState>>,
    query: Result<Query<TasksQuery>, QueryRejection>,
) -> Result<Json<Vec<TaskJson>>, TaskApiError> {
    let Query(query) = query?;
    let filter = TaskFilter::try_from(query)?;
    let tasks = TaskService::new(&state.db).list_tasks(filter).await?;
    Ok(Json(tasks.into_iter().map(TaskJson::from).collect()))
}

/// Handler for GET /api/tasks/{id}.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 200, description = "The task", body = TaskJson),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn get_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
) -> Result<Json<TaskJson>, TaskApiError> {
    let task = TaskService::new(&state.db).get_task_by_id(&id).await?;
    Ok(Json(TaskJson::from(task)))
}

/// Handler for POST /api/tasks.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskJson),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn create_task_handler(
    State(state): State<Arc<TaskState>>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskJson>), TaskApiError> {
    let Json(request) = payload?;
    require_title(&request.title)?;
    let created = TaskService::new(&state.db)
        .create_task(NewTask::from(request))
        .await?;
    Ok((StatusCode::CREATED, Json(TaskJson::from(created))))
}

/// Handler for PUT /api/tasks/{id}.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task ID")),
    request_body = ReplaceTaskRequest,
    responses(
        (status = 200, description = "Task replaced", body = TaskJson),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn replace_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
    payload: Result<Json<ReplaceTaskRequest>, JsonRejection>,
) -> Result<Json<TaskJson>, TaskApiError> {
    let Json(request) = payload?;
    require_title(&request.title)?;
    let updated = TaskService::new(&state.db)
        .update_task_by_id(&id, TaskChanges::from(request))
        .await?;
    Ok(Json(TaskJson::from(updated)))
}

/// Handler for PATCH /api/tasks/{id}.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    patch,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task ID")),
    request_body = PatchTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskJson),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn patch_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
    payload: Result<Json<PatchTaskRequest>, JsonRejection>,
) -> Result<Json<TaskJson>, TaskApiError> {
    let Json(request) = payload?;
    if let Some(title) = &request.title {
        require_title(title)?;
    }
    let updated = TaskService::new(&state.db)
        .update_task_by_id(&id, TaskChanges::from(request))
        .await?;
    Ok(Json(TaskJson::from(updated)))
}

/// Handler for DELETE /api/tasks/{id}.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task deleted", body = DeleteResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn delete_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, TaskApiError> {
    TaskService::new(&state.db).delete_task_by_id(&id).await?;
    Ok(Json(DeleteResponse { success: true }))
}

/// Creates and returns the tasks API router.
pub fn create_api_router(state: Arc<TaskState>) -> Router {
    Router::new()
        .route(
            "/api/tasks",
            get(list_tasks_handler).post(create_task_handler),
        )
        .route(
            "/api/tasks/{id}",
            get(get_task_handler)
                .put(replace_task_handler)
                .patch(patch_task_handler)
                .delete(delete_task_handler),
        )
        .with_state(state)
}
