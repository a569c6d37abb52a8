use crate::models::{Task, UserId};
use crate::remote::TaskService;
use tracing::{error, info};

/// Fetches the tasks assigned to `user_id`.
///
/// Transport failures are logged and yield an empty list.
pub async fn load_tasks(service: &dyn TaskService, user_id: UserId) -> Vec<Task> {
    match service.user_tasks(user_id).await {
        Ok(tasks) => {
            info!(user_id, count = tasks.len(), "loaded assigned tasks");
            tasks
        }
        Err(err) => {
            error!(user_id, "failed to fetch tasks: {err}");
            Vec::new()
        }
    }
}
