use crate::draft::Draft;
use serde::{Deserialize, Serialize};

pub type UserId = u64;
pub type TaskId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: u64,
    pub category_name: String,
}

/// A task assigned to a user, as returned by the remote task service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub task_id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubmissionStatus {
    Done,
    Missed,
}

/// One record of a submission batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSubmission {
    pub user_id: UserId,
    pub task_id: TaskId,
    pub status: SubmissionStatus,
}

/// A row of the user's tracked history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedTask {
    pub task_id: TaskId,
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub task_status: String,
    pub tracked_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient toast the page shows for a fixed duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub duration_ms: u64,
}

impl Notification {
    pub const DURATION_MS: u64 = 3000;

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
            duration_ms: Self::DURATION_MS,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            duration_ms: Self::DURATION_MS,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayResponse {
    pub date: String,
    pub tasks: Vec<Task>,
    pub draft: Draft,
    pub submitted: bool,
    pub can_submit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOutcome {
    Submitted,
    ConfirmationRequired,
    Cancelled,
    Failed,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub outcome: SubmitOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<Vec<TaskSubmission>>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub proceed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDay {
    pub date: String,
    pub done: usize,
    pub total: usize,
    pub tasks: Vec<TrackedTask>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResponse {
    pub days: Vec<ReportDay>,
}
