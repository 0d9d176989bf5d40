//! Ingestion configuration.
//!
//! Settings come from an optional YAML file and are then overridden by
//! `MARKETROWS_*` environment variables. Every field has a default, so an
//! empty file (or no file) is a valid configuration.
//!
//! ```yaml
//! skip_blank_lines: true
//! max_failures: 100
//! fail_on_row_error: false
//! output_format: ndjson
//! include_estimates: true
//! log_filter: "marketrows=debug"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::serialization::OutputFormat;

pub const ENV_FAIL_ON_ROW_ERROR: &str = "MARKETROWS_FAIL_ON_ROW_ERROR";
pub const ENV_MAX_FAILURES: &str = "MARKETROWS_MAX_FAILURES";
pub const ENV_OUTPUT_FORMAT: &str = "MARKETROWS_OUTPUT_FORMAT";
pub const ENV_INCLUDE_ESTIMATES: &str = "MARKETROWS_INCLUDE_ESTIMATES";
pub const ENV_LOG_FILTER: &str = "MARKETROWS_LOG_FILTER";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Yaml(serde_yaml::Error),
    InvalidEnv { var: &'static str, value: String },
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Yaml(err)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Failed to read config file {}: {}", path.display(), source)
            }
            ConfigError::Yaml(e) => write!(f, "Failed to parse YAML: {}", e),
            ConfigError::InvalidEnv { var, value } => {
                write!(f, "Invalid value for {}: {:?}", var, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings for a batch ingestion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Ignore data lines that are empty or whitespace only.
    pub skip_blank_lines: bool,

    /// Stop the batch once this many rows have failed. `None` never stops;
    /// `Some(0)` stops at the first failure.
    pub max_failures: Option<usize>,

    /// Make the CLI exit non-zero when any row failed.
    pub fail_on_row_error: bool,

    pub output_format: OutputFormat,

    /// Attach decoded range estimates to written documents.
    pub include_estimates: bool,

    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            skip_blank_lines: true,
            max_failures: None,
            fail_on_row_error: false,
            output_format: OutputFormat::Ndjson,
            include_estimates: false,
            log_filter: "info".to_string(),
        }
    }
}

impl IngestConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    /// Returns error if the file can't be read or isn't valid YAML for
    /// this struct
    ///
    /// # Example
    /// ```ignore
    /// use marketrows::runtime::IngestConfig;
    ///
    /// let config = IngestConfig::load_from_file("marketrows.yaml")?.with_env_overrides()?;
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from YAML text. Blank text gives the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply `MARKETROWS_*` variables from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from any variable lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_FAIL_ON_ROW_ERROR) {
            self.fail_on_row_error = parse_bool(ENV_FAIL_ON_ROW_ERROR, &value)?;
        }

        if let Some(value) = lookup(ENV_MAX_FAILURES) {
            self.max_failures = match value.trim() {
                "" | "none" | "unlimited" => None,
                n => Some(n.parse().map_err(|_| ConfigError::InvalidEnv {
                    var: ENV_MAX_FAILURES,
                    value: value.clone(),
                })?),
            };
        }

        if let Some(value) = lookup(ENV_OUTPUT_FORMAT) {
            self.output_format = value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_OUTPUT_FORMAT,
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup(ENV_INCLUDE_ESTIMATES) {
            self.include_estimates = parse_bool(ENV_INCLUDE_ESTIMATES, &value)?;
        }

        if let Some(value) = lookup(ENV_LOG_FILTER) {
            self.log_filter = value;
        }

        Ok(self)
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = IngestConfig::from_yaml_str("").unwrap();
        assert_eq!(config, IngestConfig::default());
        assert!(config.skip_blank_lines);
        assert_eq!(config.max_failures, None);
        assert_eq!(config.output_format, OutputFormat::Ndjson);
    }

    #[test]
    fn test_partial_yaml() {
        let config = IngestConfig::from_yaml_str("max_failures: 3\noutput_format: json\n").unwrap();

        assert_eq!(config.max_failures, Some(3));
        assert_eq!(config.output_format, OutputFormat::Json);
        assert!(config.skip_blank_lines);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_invalid_yaml() {
        let result = IngestConfig::from_yaml_str("output_format: xml\n");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_overrides() {
        let config = IngestConfig::default()
            .with_overrides(lookup(&[
                (ENV_FAIL_ON_ROW_ERROR, "yes"),
                (ENV_MAX_FAILURES, "10"),
                (ENV_OUTPUT_FORMAT, "json"),
                (ENV_INCLUDE_ESTIMATES, "1"),
                (ENV_LOG_FILTER, "debug"),
            ]))
            .unwrap();

        assert!(config.fail_on_row_error);
        assert_eq!(config.max_failures, Some(10));
        assert_eq!(config.output_format, OutputFormat::Json);
        assert!(config.include_estimates);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_override_clears_max_failures() {
        let config = IngestConfig {
            max_failures: Some(5),
            ..IngestConfig::default()
        };
        let config = config.with_overrides(lookup(&[(ENV_MAX_FAILURES, "none")])).unwrap();
        assert_eq!(config.max_failures, None);
    }

    #[test]
    fn test_invalid_override() {
        let err = IngestConfig::default()
            .with_overrides(lookup(&[(ENV_INCLUDE_ESTIMATES, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: ENV_INCLUDE_ESTIMATES, .. }));
    }
}
