use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{ConfigStoreError, Result};

/// Default poll interval for refreshable file sources.
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 10_000;

/// Default priority given to items imported from the environment.
pub const DEFAULT_ENV_PRIORITY: i64 = 15;

/// Tunables for a [`Store`](crate::Store).
///
/// Can be built in code or loaded from TOML; missing fields take their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// How often refreshable file sources are polled, in milliseconds.
    pub refresh_interval_ms: u64,

    /// Priority assigned to items imported from environment variables.
    pub env_priority: i64,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            env_priority: DEFAULT_ENV_PRIORITY,
        }
    }
}

impl StoreOptions {
    /// Parses options from a TOML string.
    ///
    /// # Errors
    /// Returns `ConfigStoreError::OptionsParseError` if the TOML is invalid or
    /// a field has the wrong type.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigStoreError::OptionsParseError {
            location: "string".to_string(),
            details: e.to_string(),
        })
    }

    /// Loads options from a TOML file.
    ///
    /// # Errors
    /// * `ConfigStoreError::IoError` - If the file cannot be read
    /// * `ConfigStoreError::OptionsParseError` - If the content is invalid
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigStoreError::io(e, path))?;

        toml::from_str(&content).map_err(|e| ConfigStoreError::OptionsParseError {
            location: path.to_string_lossy().to_string(),
            details: e.to_string(),
        })
    }

    /// Sets the refresh poll interval.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// The refresh poll interval.
    ///
    /// A zero interval is raised to one millisecond, since tokio intervals
    /// cannot tick at zero.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.max(1))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behavior() {
        let options = StoreOptions::default();

        assert_eq!(options.refresh_interval(), Duration::from_secs(10));
        assert_eq!(options.env_priority, 15);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let options = StoreOptions::from_toml_str("refresh_interval_ms = 250\n").unwrap();

        assert_eq!(options.refresh_interval(), Duration::from_millis(250));
        assert_eq!(options.env_priority, DEFAULT_ENV_PRIORITY);
    }

    #[test]
    fn invalid_toml_reports_location() {
        let err = StoreOptions::from_toml_str("env_priority = \"high\"").unwrap_err();

        match err {
            ConfigStoreError::OptionsParseError { location, .. } => assert_eq!(location, "string"),
            other => unreachable!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("store.toml");
        fs::write(&path, "env_priority = 40\n").unwrap();

        let options = StoreOptions::load(&path).unwrap();

        assert_eq!(options.env_priority, 40);
        assert_eq!(options.refresh_interval_ms, DEFAULT_REFRESH_INTERVAL_MS);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let options = StoreOptions::default().with_refresh_interval(Duration::ZERO);

        assert_eq!(options.refresh_interval(), Duration::from_millis(1));
    }
}
