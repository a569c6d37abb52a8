//! Key-value stores backing drafts and submission markers.

use crate::config::{Config, StoreBackend};
use crate::errors::TrackerError;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tokio::{fs, sync::Mutex};
use tracing::{error, info};

/// String store whose entries expire after a per-entry lifetime.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, TrackerError>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), TrackerError>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct StoredEntry {
    value: String,
    expires_at_ms: i64,
}

impl StoredEntry {
    fn new(value: String, ttl: Duration) -> Self {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        Self {
            value,
            expires_at_ms: now_ms().saturating_add(ttl_ms),
        }
    }

    fn is_live(&self, now: i64) -> bool {
        self.expires_at_ms > now
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreData {
    entries: BTreeMap<String, StoredEntry>,
}

impl StoreData {
    fn read(&mut self, key: &str) -> Option<String> {
        let now = now_ms();
        match self.entries.get(key) {
            Some(entry) if entry.is_live(now) => Some(entry.value.clone()),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn prune(&mut self) {
        let now = now_ms();
        self.entries.retain(|_, entry| entry.is_live(now));
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<StoreData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, TrackerError> {
        Ok(self.data.lock().await.read(key))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), TrackerError> {
        let mut data = self.data.lock().await;
        data.entries.insert(key.to_string(), StoredEntry::new(value, ttl));
        Ok(())
    }
}

/// Store persisted as a JSON file, rewritten on every `set`.
pub struct FileStore {
    path: PathBuf,
    data: Mutex<StoreData>,
}

impl FileStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, TrackerError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let data = load_data(&path).await;
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }
}

#[async_trait]
impl KvStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, TrackerError> {
        Ok(self.data.lock().await.read(key))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), TrackerError> {
        let mut data = self.data.lock().await;
        data.entries.insert(key.to_string(), StoredEntry::new(value, ttl));
        data.prune();
        persist_data(&self.path, &data).await
    }
}

async fn load_data(path: &Path) -> StoreData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<StoreData>(&bytes) {
            Ok(mut data) => {
                data.prune();
                data
            }
            Err(err) => {
                error!("failed to parse state file: {err}");
                StoreData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoreData::default(),
        Err(err) => {
            error!("failed to read state file: {err}");
            StoreData::default()
        }
    }
}

async fn persist_data(path: &Path, data: &StoreData) -> Result<(), TrackerError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}

pub async fn open_store(config: &Config) -> Result<Arc<dyn KvStore>, TrackerError> {
    match config.store_backend {
        StoreBackend::Memory => {
            info!("using in-memory state store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::File => {
            info!(path = %config.data_path.display(), "using file state store");
            Ok(Arc::new(FileStore::open(config.data_path.clone()).await?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: Duration = Duration::from_secs(86_400);

    fn temp_path(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "daily_tasks_store_{tag}_{}_{nanos}.json",
            std::process::id()
        ))
    }

    #[tokio::test]
    async fn memory_store_returns_latest_value() {
        let store = MemoryStore::new();
        store.set("k", "one".into(), DAY).await.unwrap();
        store.set("k", "two".into(), DAY).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("two"));
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_entries_read_as_absent() {
        let store = MemoryStore::new();
        store.set("k", "gone".into(), Duration::ZERO).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_survives_reopen() {
        let path = temp_path("reopen");
        {
            let store = FileStore::open(&path).await.unwrap();
            store.set("taskSubmission_1_2026-01-05", "true".into(), DAY).await.unwrap();
        }
        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get("taskSubmission_1_2026-01-05").await.unwrap().as_deref(),
            Some("true")
        );
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn corrupt_file_starts_empty() {
        let path = temp_path("corrupt");
        std::fs::write(&path, b"{not json").unwrap();
        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get("anything").await.unwrap(), None);
        let _ = std::fs::remove_file(&path);
    }
}
