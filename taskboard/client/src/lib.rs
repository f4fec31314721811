//! HTTP implementation of [`TaskApi`] and the terminal rendering around it.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use taskboard_core::api::{DeleteResponse, ErrorBody};
use taskboard_core::{ApiError, Task, TaskApi, TaskDraft, TaskPatch, TaskQuery};

pub mod config;
pub mod view;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Talks to the task service at `{api_url}/api/tasks`.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: Client,
    tasks_url: String,
}

impl HttpTaskApi {
    pub fn new(api_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            tasks_url: format!("{}/api/tasks", api_url.trim_end_matches('/')),
        })
    }

    fn task_url(&self, id: &str) -> String {
        format!("{}/{}", self.tasks_url, id)
    }
}

/// Sends the request and decodes a success body, mapping every failure to an [`ApiError`].
async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|err| ApiError::Transport(err.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()));
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(match status {
        StatusCode::NOT_FOUND => ApiError::NotFound,
        StatusCode::BAD_REQUEST => ApiError::Validation(message),
        _ => ApiError::Server {
            status: status.as_u16(),
            message,
        },
    })
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    #[tracing::instrument(skip(self))]
    async fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>, ApiError> {
        send_json(self.client.get(&self.tasks_url).query(query)).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_task(&self, id: &str) -> Result<Task, ApiError> {
        send_json(self.client.get(self.task_url(id))).await
    }

    #[tracing::instrument(skip(self))]
    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        send_json(self.client.post(&self.tasks_url).json(draft)).await
    }

    #[tracing::instrument(skip(self))]
    async fn replace_task(&self, id: &str, draft: &TaskDraft) -> Result<Task, ApiError> {
        send_json(self.client.put(self.task_url(id)).json(draft)).await
    }

    #[tracing::instrument(skip(self))]
    async fn patch_task(&self, id: &str, patch: &TaskPatch) -> Result<Task, ApiError> {
        send_json(self.client.patch(self.task_url(id)).json(patch)).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        send_json::<DeleteResponse>(self.client.delete(self.task_url(id)))
            .await
            .map(|_| ())
    }
}
