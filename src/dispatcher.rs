use crate::draft::{Draft, control_key};
use crate::errors::TrackerError;
use crate::guard::SubmissionMarkers;
use crate::models::{SubmissionStatus, Task, TaskSubmission, UserId};
use crate::remote::TaskService;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const SUCCESS_MESSAGE: &str = "Tasks submitted successfully";
pub const FAILURE_MESSAGE: &str = "Error submitting tasks";

/// One record per task, in task order: DONE when its control is checked.
pub fn build_batch(user_id: UserId, tasks: &[Task], draft: &Draft) -> Vec<TaskSubmission> {
    tasks
        .iter()
        .map(|task| {
            let checked = draft
                .get(&control_key(task.task_id))
                .copied()
                .unwrap_or(false);
            TaskSubmission {
                user_id,
                task_id: task.task_id,
                status: if checked {
                    SubmissionStatus::Done
                } else {
                    SubmissionStatus::Missed
                },
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct Dispatcher {
    service: Arc<dyn TaskService>,
    markers: SubmissionMarkers,
}

impl Dispatcher {
    pub fn new(service: Arc<dyn TaskService>, markers: SubmissionMarkers) -> Self {
        Self { service, markers }
    }

    /// Sends the batch and, once the service accepts it, marks the day as submitted.
    pub async fn submit(
        &self,
        user_id: UserId,
        date: NaiveDate,
        tasks: &[Task],
        draft: &Draft,
    ) -> Result<Vec<TaskSubmission>, TrackerError> {
        let batch = build_batch(user_id, tasks, draft);
        if batch.is_empty() {
            warn!(user_id, date = %date, "submitting an empty batch");
        }

        self.service.submit(&batch).await?;

        // The service already holds the batch; a lost marker only costs a skipped prompt.
        if let Err(err) = self.markers.mark(user_id, date).await {
            error!(user_id, date = %date, "failed to write submission marker: {err}");
        }
        info!(user_id, date = %date, records = batch.len(), "tasks submitted");
        Ok(batch)
    }
}
