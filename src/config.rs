//! Configuration system
//!
//! Provides layered configuration with:
//! - Runtime defaults matching the GeoLife layout
//! - Config file loading (optional)
//! - Environment variable overrides
//! - Validation

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::models::DEFAULT_SAMPLE_LIMIT;
use crate::parser::DEFAULT_MIN_FIELDS;

/// Default file name for the cleaned dataset
pub const DEFAULT_OUTPUT_FILE: &str = "geolife_trajectories_cleaned.csv";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Run options (root, output, verbosity, file cap)
    pub collection: CollectionConfig,

    /// Source dataset layout
    pub dataset: DatasetConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_directory: Option<PathBuf>,
    pub output_path: PathBuf,
    pub verbose: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_files_per_owner: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Subdirectory of an owner that holds trajectory files
    pub trajectory_dir: String,
    /// Matched case-insensitively, without the dot
    pub file_extension: String,
    pub header_lines: usize,
    pub sample_limit: usize,
    pub min_fields: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "WARN".to_string(),
            format: "pretty".to_string(),
            output: "console".to_string(),
            directory: PathBuf::from("logs"),
        }
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            root_directory: None,
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            verbose: true,
            limit_files_per_owner: None,
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            trajectory_dir: "Trajectory".to_string(),
            file_extension: "plt".to_string(),
            header_lines: 6,
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            min_fields: DEFAULT_MIN_FIELDS,
        }
    }
}

impl Config {
    /// Load configuration from file, environment, and defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match explicit_path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_from_default_locations()?,
        };

        // Override with environment variables
        config.apply_env_overrides()?;

        config.validate()?;

        Ok(config)
    }

    fn load_from_default_locations() -> Result<Self> {
        let config_paths = [
            PathBuf::from("geolife-clean.toml"),
            PathBuf::from(".geolife-clean.toml"),
            dirs::config_dir()
                .map(|d| d.join("geolife-clean").join("config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                info!(config_file = %path.display(), "Loading configuration from file");
                return Self::load_from_file(path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        // Logging overrides
        if let Ok(val) = env::var("LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Ok(val) = env::var("LOG_OUTPUT") {
            self.logging.output = val;
        }
        if let Ok(val) = env::var("GEOLIFE_LOG_DIR") {
            self.logging.directory = PathBuf::from(val);
        }

        // Collection overrides
        if let Ok(val) = env::var("GEOLIFE_ROOT") {
            self.collection.root_directory = Some(PathBuf::from(val));
        }
        if let Ok(val) = env::var("GEOLIFE_OUTPUT") {
            self.collection.output_path = PathBuf::from(val);
        }
        if let Ok(val) = env::var("GEOLIFE_VERBOSE") {
            self.collection.verbose = val.parse().context("Invalid GEOLIFE_VERBOSE")?;
        }
        if let Ok(val) = env::var("GEOLIFE_LIMIT_FILES") {
            self.collection.limit_files_per_owner =
                Some(val.parse().context("Invalid GEOLIFE_LIMIT_FILES")?);
        }

        // Dataset overrides
        if let Ok(val) = env::var("GEOLIFE_HEADER_LINES") {
            self.dataset.header_lines = val.parse().context("Invalid GEOLIFE_HEADER_LINES")?;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(anyhow::anyhow!(
                "Log format must be 'pretty' or 'json', got '{}'",
                self.logging.format
            ));
        }

        if !matches!(self.logging.output.as_str(), "console" | "file" | "both") {
            return Err(anyhow::anyhow!(
                "Log output must be 'console', 'file' or 'both', got '{}'",
                self.logging.output
            ));
        }

        if self.dataset.trajectory_dir.trim().is_empty() {
            return Err(anyhow::anyhow!("Trajectory directory name cannot be empty"));
        }

        if self.dataset.file_extension.trim_start_matches('.').is_empty() {
            return Err(anyhow::anyhow!("File extension cannot be empty"));
        }

        // date, time and the altitude fallback are addressed from the end
        if self.dataset.min_fields < 3 {
            return Err(anyhow::anyhow!(
                "Minimum field count must be at least 3, got {}",
                self.dataset.min_fields
            ));
        }

        if self.dataset.sample_limit > 1000 {
            return Err(anyhow::anyhow!(
                "Sample limit must be at most 1000, got {}",
                self.dataset.sample_limit
            ));
        }

        if self.collection.limit_files_per_owner == Some(0) {
            warn!("limit_files_per_owner is 0, treating as unlimited");
        }

        Ok(())
    }

    /// Save current configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        info!(path = %path.display(), "Configuration saved to file");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "WARN");
        assert_eq!(config.dataset.header_lines, 6);
        assert_eq!(config.dataset.sample_limit, 5);
        assert!(config.collection.verbose);
        assert_eq!(config.collection.limit_files_per_owner, None);
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());
        config.dataset.min_fields = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[collection]\nverbose = false\n").unwrap();
        assert!(!config.collection.verbose);
        assert_eq!(config.dataset, DatasetConfig::default());
        assert_eq!(config.collection.output_path, PathBuf::from(DEFAULT_OUTPUT_FILE));
    }
}
