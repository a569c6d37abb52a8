//! Client for the remote task service.

use crate::config::Config;
use crate::errors::TrackerError;
use crate::models::{Task, TaskSubmission, TrackedTask, UserId};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

#[async_trait]
pub trait TaskService: Send + Sync {
    async fn user_tasks(&self, user_id: UserId) -> Result<Vec<Task>, TrackerError>;

    /// Sends a whole batch in one request.
    async fn submit(&self, batch: &[TaskSubmission]) -> Result<(), TrackerError>;

    async fn user_report(&self, user_id: UserId) -> Result<Vec<TrackedTask>, TrackerError>;
}

pub struct HttpTaskService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTaskService {
    pub fn new(config: &Config) -> Result<Self, TrackerError> {
        let client = reqwest::Client::builder()
            .timeout(config.remote_timeout)
            .build()?;
        Ok(Self {
            base_url: config.service_url.clone(),
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TrackerError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::Transport(format!("GET {path} returned {status}: {body}")));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl TaskService for HttpTaskService {
    async fn user_tasks(&self, user_id: UserId) -> Result<Vec<Task>, TrackerError> {
        self.get_json(&format!("/api/tasks/user/{user_id}")).await
    }

    async fn submit(&self, batch: &[TaskSubmission]) -> Result<(), TrackerError> {
        let url = format!("{}/api/tasks/user", self.base_url);
        let response = self.client.post(&url).json(batch).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::Transport(format!(
                "POST /api/tasks/user returned {status}: {body}"
            )));
        }
        Ok(())
    }

    async fn user_report(&self, user_id: UserId) -> Result<Vec<TrackedTask>, TrackerError> {
        self.get_json(&format!("/api/users/report/{user_id}")).await
    }
}
