//! Logging configuration
//!
//! The `[logging]` table: filter level plus optional rolling file output.
//! Nothing is ever logged to the terminal, which belongs to the TUI.

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Log Rotation
// ─────────────────────────────────────────────────────────────────────────────

/// Log file rotation strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    /// Single log file
    Never,
}

impl LogRotation {
    /// Parse rotation string from config; unknown values fall back to daily
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "hourly" => Self::Hourly,
            "never" => Self::Never,
            _ => Self::Daily,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive: trace, debug, info, warn, error (or a full EnvFilter string)
    pub level: String,
    /// Write JSON log lines to `file_dir`
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    /// Prefix for log file names ("clipz" -> "clipz.2024-01-15")
    pub file_prefix: String,
}

impl LoggingConfig {
    /// Defaults with log files kept under `config_dir/logs`
    pub fn for_config_dir(config_dir: &Path) -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: config_dir.join("logs"),
            file_rotation: LogRotation::Daily,
            file_prefix: "clipz".to_string(),
        }
    }

    /// Overlay the file's `[logging]` table on the defaults
    pub fn from_file(file: Option<FileLogging>, config_dir: &Path) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::for_config_dir(config_dir);

        Self {
            level: file.level.unwrap_or(defaults.level),
            file_enabled: file.file_enabled.unwrap_or(defaults.file_enabled),
            file_dir: file
                .file_dir
                .map(|dir| super::expand_tilde(&dir))
                .unwrap_or(defaults.file_dir),
            file_rotation: file
                .file_rotation
                .map(|s| LogRotation::parse(&s))
                .unwrap_or(defaults.file_rotation),
            file_prefix: file.file_prefix.unwrap_or(defaults.file_prefix),
        }
    }
}

/// Logging settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}
