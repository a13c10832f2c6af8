//! Configuration management for tool-digest.
//!
//! Handles:
//! - Output selection threshold
//! - Compaction thresholds
//!
//! The global file lives at `<config dir>/tool-digest/config.toml`; a
//! `.tool-digest.toml` in the project directory overrides it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DigestError, Result};
use crate::util::atomic_write;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Dual-output selection.
    #[serde(default)]
    pub selector: SelectorConfig,
    /// Compact projection.
    #[serde(default)]
    pub compact: CompactConfig,
}

/// Project-specific configuration filename.
pub const PROJECT_CONFIG_FILENAME: &str = ".tool-digest.toml";

/// Default compact/raw size ratio.
pub const DEFAULT_MAX_RATIO: f64 = 1.0;

/// Default line coverage percentage below which a file is listed.
pub const DEFAULT_COVERAGE_FLOOR: f64 = 80.0;

impl Config {
    /// Load configuration from `global_path`, or defaults when it does not exist.
    ///
    /// A file that exists but fails to parse or validate is an error.
    pub fn load_global(global_path: &Path) -> Result<Self> {
        if global_path.exists() {
            Self::load_from(global_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration with project-specific overrides.
    ///
    /// Searches for `.tool-digest.toml` in the given project directory
    /// and merges it over the global configuration.
    pub fn load_for_project(project_dir: &Path) -> Result<Self> {
        Self::load_layered(&default_config_path()?, project_dir)
    }

    /// Merge `.tool-digest.toml` in `project_dir` over the config at `global_path`.
    pub fn load_layered(global_path: &Path, project_dir: &Path) -> Result<Self> {
        let mut config = Self::load_global(global_path)?;

        let project_config_path = project_dir.join(PROJECT_CONFIG_FILENAME);
        if project_config_path.exists() {
            debug!(path = %project_config_path.display(), "Applying project config");
            let project_config = Self::load_from(&project_config_path)?;
            config.merge_from(&project_config);
        }

        Ok(config)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DigestError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                DigestError::io(format!("Failed to read config file: {}", path.display()), e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| DigestError::InvalidConfig {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        let ratio = self.selector.max_ratio;
        if !ratio.is_finite() || ratio < 0.0 {
            return Err(DigestError::InvalidConfig {
                message: format!("selector.max_ratio must be a non-negative number, got {ratio}"),
            });
        }
        let floor = self.compact.coverage_floor;
        if !(0.0..=100.0).contains(&floor) {
            return Err(DigestError::InvalidConfig {
                message: format!("compact.coverage_floor must be between 0 and 100, got {floor}"),
            });
        }
        Ok(())
    }

    /// Merge another config into this one (other takes precedence).
    ///
    /// Values still at their default in `other` do not override.
    pub fn merge_from(&mut self, other: &Config) {
        if (other.selector.max_ratio - DEFAULT_MAX_RATIO).abs() > f64::EPSILON {
            self.selector.max_ratio = other.selector.max_ratio;
        }
        if (other.compact.coverage_floor - DEFAULT_COVERAGE_FLOOR).abs() > f64::EPSILON {
            self.compact.coverage_floor = other.compact.coverage_floor;
        }
    }

    /// Save configuration to a specific path, atomically.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| DigestError::InvalidConfig {
            message: format!("Failed to serialize config: {e}"),
        })?;

        atomic_write(path, content.as_bytes())
    }
}

/// Dual-output selection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// The compact form is chosen while its serialized size is at most
    /// this fraction of the raw output size.
    #[serde(default = "default_max_ratio")]
    pub max_ratio: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_ratio: DEFAULT_MAX_RATIO,
        }
    }
}

/// Compact projection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactConfig {
    /// Files with line coverage below this percentage are listed.
    #[serde(default = "default_coverage_floor")]
    pub coverage_floor: f64,
}

impl Default for CompactConfig {
    fn default() -> Self {
        Self {
            coverage_floor: DEFAULT_COVERAGE_FLOOR,
        }
    }
}

fn default_max_ratio() -> f64 {
    DEFAULT_MAX_RATIO
}

fn default_coverage_floor() -> f64 {
    DEFAULT_COVERAGE_FLOOR
}

/// Get the default configuration path.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| DigestError::Unsupported {
        feature: "config directory discovery".to_string(),
    })?;

    Ok(config_dir.join("tool-digest").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!((config.selector.max_ratio - 1.0).abs() < f64::EPSILON);
        assert!((config.compact.coverage_floor - 80.0).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: Config = toml::from_str("[selector]\nmax_ratio = 0.25\n").unwrap();
        assert!((parsed.selector.max_ratio - 0.25).abs() < f64::EPSILON);
        assert!((parsed.compact.coverage_floor - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.compact.coverage_floor = 50.0;

        let mut override_config = Config::default();
        override_config.selector.max_ratio = 0.5;

        base.merge_from(&override_config);

        assert!((base.selector.max_ratio - 0.5).abs() < f64::EPSILON);
        assert!((base.compact.coverage_floor - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[compact]\ncoverage_floor = 150.0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, DigestError::InvalidConfig { .. }));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, DigestError::FileNotFound { .. }));
    }

    #[test]
    fn test_load_for_project() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join(PROJECT_CONFIG_FILENAME),
            "[compact]\ncoverage_floor = 90.0\n",
        )
        .unwrap();

        std::fs::write(temp_dir.path().join("global.toml"), "[selector]\nmax_ratio = 0.5\n").unwrap();

        let config = Config::load_layered(&temp_dir.path().join("global.toml"), temp_dir.path()).unwrap();

        assert!((config.selector.max_ratio - 0.5).abs() < f64::EPSILON);
        assert!((config.compact.coverage_floor - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_global_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Config::load_layered(&temp_dir.path().join("absent.toml"), temp_dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_broken_global_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let global = temp_dir.path().join("global.toml");

        std::fs::write(&global, "[selector\nmax_ratio = 0.5\n").unwrap();
        let err = Config::load_layered(&global, temp_dir.path()).unwrap_err();
        assert!(matches!(err, DigestError::InvalidConfig { .. }));

        std::fs::write(&global, "[selector]\nmax_ratio = -2.0\n").unwrap();
        let err = Config::load_layered(&global, temp_dir.path()).unwrap_err();
        assert!(matches!(err, DigestError::InvalidConfig { .. }));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tool-digest").join("config.toml");
        let mut config = Config::default();
        config.selector.max_ratio = 0.75;

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded, config);
    }
}
