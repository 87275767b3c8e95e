//! Configuration for defersched

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Initial capacity reserved for the pending queue
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,

    /// Queue depth at which a warning is logged on enqueue
    #[serde(default = "default_depth_warning")]
    pub depth_warning: usize,
}

fn default_initial_capacity() -> usize {
    crate::DEFAULT_INITIAL_CAPACITY
}

fn default_depth_warning() -> usize {
    crate::DEFAULT_DEPTH_WARNING
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_capacity: default_initial_capacity(),
            depth_warning: default_depth_warning(),
        }
    }
}

impl SchedulerConfig {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            let content = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config from {}", config_path.display()))?;
            let config: SchedulerConfig =
                serde_yaml::from_str(&content).context("Failed to parse config file")?;
            return Ok(config);
        }

        // Try default locations
        let default_paths = [
            Some(PathBuf::from("defersched.yml")),
            dirs::config_dir().map(|p| p.join("defersched").join("config.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let config: SchedulerConfig = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.initial_capacity, crate::DEFAULT_INITIAL_CAPACITY);
        assert_eq!(config.depth_warning, crate::DEFAULT_DEPTH_WARNING);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: SchedulerConfig = serde_yaml::from_str("initial_capacity: 32\n").unwrap();
        assert_eq!(config.initial_capacity, 32);
        assert_eq!(config.depth_warning, crate::DEFAULT_DEPTH_WARNING);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");

        let config = SchedulerConfig {
            initial_capacity: 16,
            depth_warning: 100,
        };
        config.save(&path).unwrap();

        let loaded = SchedulerConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded.initial_capacity, 16);
        assert_eq!(loaded.depth_warning, 100);
    }

    #[test]
    fn test_load_missing_explicit_path_errors() {
        let result = SchedulerConfig::load(Some(&PathBuf::from("/nonexistent/defersched.yml")));
        assert!(result.is_err());
    }
}
