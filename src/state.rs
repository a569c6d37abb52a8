use crate::config::Config;
use crate::errors::TrackerError;
use crate::remote::{HttpTaskService, TaskService};
use crate::storage::{KvStore, open_store};
use crate::tracker::Tracker;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<Tracker>,
}

impl AppState {
    pub fn new(service: Arc<dyn TaskService>, store: Arc<dyn KvStore>, config: &Config) -> Self {
        Self {
            tracker: Arc::new(Tracker::new(service, store, config.state_ttl)),
        }
    }

    pub async fn from_config(config: &Config) -> Result<Self, TrackerError> {
        let store = open_store(config).await?;
        let service = Arc::new(HttpTaskService::new(config)?);
        Ok(Self::new(service, store, config))
    }
}
