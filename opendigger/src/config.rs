//! Client settings. Read from a TOML file; every field is optional.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "https://oss.open-digger.cn";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub max_retry_delay_ms: u64,
    /// How long a loaded project bundle is served from cache.
    pub cache_ttl_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: 10,
            max_retries: 3,
            retry_delay_ms: 1000,
            max_retry_delay_ms: 10_000,
            cache_ttl_secs: 300,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.retry_delay_ms),
            max_delay: Duration::from_millis(self.max_retry_delay_ms),
        }
    }
}

/// Loads the client config. Returns `ClientConfig::default()` if the file
/// doesn't exist; propagates other I/O and parse errors.
pub fn load(path: &Path) -> io::Result<ClientConfig> {
    match fs::read_to_string(path) {
        Ok(content) => {
            toml::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ClientConfig::default()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("opendigger-{}-{name}", std::process::id()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = load(Path::new("/nonexistent/opendigger.toml")).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let path = temp_file("partial.toml", "max_retries = 1\ncache_ttl_secs = 60\n");
        let config = load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.max_retries, 1);
        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.retry_policy().base_delay, Duration::from_secs(1));
    }

    #[test]
    fn bad_toml_is_invalid_data() {
        let path = temp_file("bad.toml", "max_retries = \"lots\"\n");
        let err = load(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
