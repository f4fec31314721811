//! Remote seam between the dashboard and the task service.

use crate::task::{Task, TaskDraft, TaskPatch, TaskQuery};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures reported by a [`TaskApi`] implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server has no task with the requested id (404).
    #[error("Task not found")]
    NotFound,
    /// The request body or query was rejected (400).
    #[error("Invalid request: {0}")]
    Validation(String),
    /// Any other non-success status.
    #[error("Server responded with {status}: {message}")]
    Server { status: u16, message: String },
    /// Connection failure, timeout, or similar before a response arrived.
    #[error("Request failed: {0}")]
    Transport(String),
    /// A success response whose body could not be read.
    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Error body returned by the server alongside 4xx/5xx statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Body returned by a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Operations the dashboard needs from the task service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Lists tasks matching `query`, ordered by `datetime` ascending.
    async fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>, ApiError>;

    async fn get_task(&self, id: &str) -> Result<Task, ApiError>;

    /// Stores a new task and returns it with its server-assigned id.
    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError>;

    /// Overwrites the editable fields of task `id`.
    async fn replace_task(&self, id: &str, draft: &TaskDraft) -> Result<Task, ApiError>;

    /// Merges `patch` into task `id`.
    async fn patch_task(&self, id: &str, patch: &TaskPatch) -> Result<Task, ApiError>;

    async fn delete_task(&self, id: &str) -> Result<(), ApiError>;
}
