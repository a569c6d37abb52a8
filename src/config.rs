use std::{env, path::PathBuf, str::FromStr, time::Duration};
use tracing::warn;

pub const DEFAULT_SERVICE_URL: &str = "https://tarbiya-task-service.onrender.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    File,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub store_backend: StoreBackend,
    pub service_url: String,
    /// Lifetime of drafts and submission markers.
    pub state_ttl: Duration,
    pub remote_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            data_path: PathBuf::from("data/state.json"),
            store_backend: StoreBackend::File,
            service_url: DEFAULT_SERVICE_URL.to_string(),
            state_ttl: Duration::from_secs(24 * 60 * 60),
            remote_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let data_path = env::var("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);
        let service_url = env::var("TASK_SERVICE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.service_url);

        Self {
            port: parse_var("PORT").unwrap_or(defaults.port),
            data_path,
            store_backend: parse_var("STORE_BACKEND").unwrap_or(defaults.store_backend),
            service_url,
            state_ttl: parse_var::<u64>("DRAFT_TTL_HOURS")
                .map(|hours| Duration::from_secs(hours * 60 * 60))
                .unwrap_or(defaults.state_ttl),
            remote_timeout: parse_var::<u64>("REMOTE_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.remote_timeout),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_backend_parses_case_insensitively() {
        assert_eq!("Memory".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert_eq!(" file ".parse::<StoreBackend>(), Ok(StoreBackend::File));
        assert!("redis".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn defaults_keep_state_for_a_day() {
        let config = Config::default();
        assert_eq!(config.state_ttl, Duration::from_secs(86_400));
        assert_eq!(config.port, 8080);
    }
}
