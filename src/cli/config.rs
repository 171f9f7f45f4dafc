//! Configuration file and flag resolution
//!
//! The config file is optional JSON:
//!
//! ```json
//! { "env_path": "/boot/uboot.env", "env_size": 16384 }
//! ```
//!
//! Command-line flags override file values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::args::GlobalArgs;
use super::errors::{CliError, CliResult};
use crate::codec::{Layout, ParseMode, DEFAULT_HEADER_SIZE};
use crate::env::EnvOptions;
use crate::observability::{log_event_with_fields, Event, Logger, Severity};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Environment file or device
    #[serde(default)]
    pub env_path: Option<PathBuf>,

    /// Total environment size in bytes; checked on open, used on create
    #[serde(default)]
    pub env_size: Option<usize>,

    /// Header size in bytes (default 4)
    #[serde(default = "default_header_size")]
    pub header_size: usize,

    /// Skip malformed entries on open (default false)
    #[serde(default)]
    pub best_effort: bool,

    /// Lowest logged severity (default "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_header_size() -> usize {
    DEFAULT_HEADER_SIZE
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env_path: None,
            env_size: None,
            header_size: default_header_size(),
            best_effort: false,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        let display = path.display().to_string();
        log_event_with_fields(Event::ConfigLoaded, &[("path", display.as_str())]);

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        Layout::new(self.header_size)
            .map_err(|e| CliError::config_error(format!("Invalid header_size: {}", e)))?;

        if Severity::parse(&self.log_level).is_none() {
            return Err(CliError::config_error(format!(
                "Invalid log_level: '{}'",
                self.log_level
            )));
        }

        Ok(())
    }
}

/// Effective settings after merging config file and flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub env_path: PathBuf,
    pub env_size: Option<usize>,
    pub layout: Layout,
    pub mode: ParseMode,
}

impl Settings {
    /// Merges flags over the config file (if any) and applies the log level.
    pub fn resolve(global: &GlobalArgs) -> CliResult<Self> {
        let config = match global.config {
            Some(ref path) => Config::load(path)?,
            None => Config::default(),
        };

        let level = if global.verbose {
            Severity::Info
        } else {
            Severity::parse(&config.log_level).unwrap_or(Severity::Warn)
        };
        Logger::set_min_severity(level);

        Self::merge(global, config)
    }

    fn merge(global: &GlobalArgs, config: Config) -> CliResult<Self> {
        let env_path = global
            .file
            .clone()
            .or(config.env_path)
            .ok_or_else(|| CliError::config_error("No environment file given (--file or env_path)"))?;

        let layout = Layout::new(global.header_size.unwrap_or(config.header_size))?;

        let mode = if global.best_effort || config.best_effort {
            ParseMode::BestEffort
        } else {
            ParseMode::Strict
        };

        Ok(Self {
            env_path,
            env_size: config.env_size,
            layout,
            mode,
        })
    }

    /// Options for opening the configured store
    pub fn open_options(&self) -> EnvOptions {
        let options = EnvOptions::new().mode(self.mode).layout(self.layout);
        match self.env_size {
            Some(size) => options.expected_size(size),
            None => options,
        }
    }
}
