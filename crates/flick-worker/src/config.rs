//! Worker configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Root directory for permanent artifact storage
    pub storage_root: PathBuf,
    /// Directory for in-flight temporary outputs
    pub tmp_dir: PathBuf,
    /// Path of the JSON movie catalog
    pub catalog_path: PathBuf,
    /// Per-invocation timeout for the external tools
    pub tool_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("media"),
            tmp_dir: PathBuf::from("media/tmp"),
            catalog_path: PathBuf::from("catalog.json"),
            tool_timeout: Duration::from_secs(3600),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let storage_root = std::env::var("FLICK_STORAGE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("media"));

        let tmp_dir = std::env::var("FLICK_TMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| storage_root.join("tmp"));

        Self {
            storage_root,
            tmp_dir,
            catalog_path: std::env::var("FLICK_CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("catalog.json")),
            tool_timeout: Duration::from_secs(
                std::env::var("FLICK_TOOL_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3600),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WorkerConfig::default();
        assert_eq!(config.tmp_dir, PathBuf::from("media/tmp"));
        assert_eq!(config.tool_timeout, Duration::from_secs(3600));
    }
}
