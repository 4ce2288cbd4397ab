//! Configuration management for sysexec.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Args;
use crate::execution::{ExecutorConfig, DEFAULT_OUTPUT_MODE, DEFAULT_SHELL, DEFAULT_SHELL_FLAG};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Executor configuration.
    pub executor: ExecutorSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Executor configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorSection {
    /// Shell interpreter for command lines.
    pub shell: PathBuf,
    /// Flag passed to the shell before the command line.
    pub shell_flag: String,
    /// Permission bits for redirect output files.
    pub output_mode: u32,
}

impl Default for ExecutorSection {
    fn default() -> Self {
        Self {
            shell: PathBuf::from(DEFAULT_SHELL),
            shell_flag: DEFAULT_SHELL_FLAG.to_string(),
            output_mode: DEFAULT_OUTPUT_MODE,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace) or a filter directive.
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    /// Apply overrides from a variable lookup.
    fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(shell) = lookup("SYSEXEC_SHELL").filter(|s| !s.is_empty()) {
            self.executor.shell = PathBuf::from(shell);
        }

        if let Some(level) = lookup("SYSEXEC_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Some(level) = lookup("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ref shell) = args.shell {
            self.executor.shell = shell.clone();
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match args.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };

        config.apply_env();
        config.apply_args(args);
        config.validate()?;

        Ok(config)
    }

    /// Check values the executor cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.executor.shell.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("executor.shell is empty".into()));
        }
        if self.executor.output_mode > 0o7777 {
            return Err(ConfigError::Invalid(format!(
                "executor.output_mode {:o} is not a permission mode",
                self.executor.output_mode
            )));
        }
        Ok(())
    }

    /// Convert to the executor's settings.
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            shell: self.executor.shell.clone(),
            shell_flag: self.executor.shell_flag.clone(),
            output_mode: self.executor.output_mode,
        }
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error.
    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.executor.shell, PathBuf::from(DEFAULT_SHELL));
        assert_eq!(config.executor.output_mode, 0o644);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "executor": {
                "shell": "/bin/bash",
                "shell_flag": "-c",
                "output_mode": 384
            },
            "logging": {
                "level": "debug"
            }
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.executor.shell, PathBuf::from("/bin/bash"));
        assert_eq!(config.executor.output_mode, 0o600);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_config_partial_json() {
        let json = r#"{ "logging": { "level": "warn" } }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.executor.shell, PathBuf::from(DEFAULT_SHELL)); // Default
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_config_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_config_missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/sysexec.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_apply_vars() {
        let mut config = Config::default();
        config.apply_vars(lookup(&[
            ("SYSEXEC_SHELL", "/bin/dash"),
            ("SYSEXEC_LOG_LEVEL", "trace"),
            ("RUST_LOG", "error"),
        ]));

        assert_eq!(config.executor.shell, PathBuf::from("/bin/dash"));
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn test_apply_vars_rust_log_fallback() {
        let mut config = Config::default();
        config.apply_vars(lookup(&[("RUST_LOG", "error"), ("SYSEXEC_SHELL", "")]));

        assert_eq!(config.executor.shell, PathBuf::from(DEFAULT_SHELL));
        assert_eq!(config.logging.level, "error");
    }

    #[test]
    fn test_apply_args() {
        let mut config = Config::default();
        let args = Args {
            shell: Some(PathBuf::from("/bin/zsh")),
            log_level: Some("debug".to_string()),
            ..Args::default()
        };

        config.apply_args(&args);

        assert_eq!(config.executor.shell, PathBuf::from("/bin/zsh"));
        assert_eq!(config.log_filter(), "debug");
    }

    #[test]
    fn test_validate_rejects_bad_mode() {
        let mut config = Config::default();
        config.executor.output_mode = 0o17777;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_empty_shell() {
        let mut config = Config::default();
        config.executor.shell = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_executor_config() {
        let mut config = Config::default();
        config.executor.output_mode = 0o600;

        let executor = config.executor_config();
        assert_eq!(executor.output_mode, 0o600);
        assert_eq!(executor.shell, config.executor.shell);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"shell\""));
        assert!(json.contains("\"output_mode\""));
    }
}
