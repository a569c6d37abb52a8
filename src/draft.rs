use crate::errors::TrackerError;
use crate::models::{Task, TaskId, UserId};
use crate::storage::KvStore;
use chrono::NaiveDate;
use std::{collections::BTreeMap, sync::Arc, time::Duration};
use tracing::{debug, warn};

/// Checkbox state for one user and day, keyed by control key.
pub type Draft = BTreeMap<String, bool>;

pub fn control_key(task_id: TaskId) -> String {
    format!("task_{task_id}")
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn draft_key(user_id: UserId, date: NaiveDate) -> String {
    format!("taskState_{user_id}_{}", date_key(date))
}

/// Fills in a `false` control for every task the draft does not mention.
pub fn with_defaults(tasks: &[Task], mut draft: Draft) -> Draft {
    for task in tasks {
        draft.entry(control_key(task.task_id)).or_insert(false);
    }
    draft
}

pub fn any_checked(draft: &Draft) -> bool {
    draft.values().any(|checked| *checked)
}

#[derive(Clone)]
pub struct DraftStore {
    store: Arc<dyn KvStore>,
    ttl: Duration,
}

impl DraftStore {
    pub fn new(store: Arc<dyn KvStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Returns the stored draft for the day, or an empty one.
    ///
    /// A stored value that no longer parses is logged and read as empty.
    pub async fn load(&self, user_id: UserId, date: NaiveDate) -> Result<Draft, TrackerError> {
        let key = draft_key(user_id, date);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(Draft::new());
        };
        match serde_json::from_str::<Draft>(&raw) {
            Ok(draft) => Ok(draft),
            Err(err) => {
                warn!(user_id, date = %date, "discarding unreadable draft: {err}");
                Ok(Draft::new())
            }
        }
    }

    /// Overwrites the whole draft for the day.
    pub async fn save(
        &self,
        user_id: UserId,
        date: NaiveDate,
        draft: &Draft,
    ) -> Result<(), TrackerError> {
        let payload = serde_json::to_string(draft)?;
        self.store.set(&draft_key(user_id, date), payload, self.ttl).await?;
        debug!(user_id, date = %date, controls = draft.len(), "draft saved");
        Ok(())
    }
}
