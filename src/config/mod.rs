//! Configuration
//!
//! Configuration is resolved in order of precedence:
//! 1. Command-line flags (highest priority)
//! 2. Config file (<configdir>/config.toml)
//! 3. Built-in defaults (lowest priority)
//!
//! `$EDITOR` fills in the editor when the file doesn't name one.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::app::{Action, KeyChord, KeyDispatcher};
use crate::transform::Transform;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod keys;
mod observability;
mod serialization;

#[cfg(test)]
mod tests;

pub use keys::{parse_bindings, BindingSpec, UNBIND};
pub use observability::{FileLogging, LogRotation, LoggingConfig};
pub use serialization::transform_to_toml;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Config file name inside the config directory
pub const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_BUFFER_SIZE: usize = 100;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Holds config.toml, the saved list and the optional history file
    pub config_dir: PathBuf,

    /// Capture history capacity (at least 1)
    pub buffer_size: usize,

    /// Keep leading/trailing CR/LF on clips
    pub leave_crlf: bool,

    /// Editor command line for the editor transform
    pub editor: Option<String>,

    /// Sleep between loop iterations
    pub poll_interval_ms: u64,

    /// Keep the capture history across restarts
    pub persist_history: bool,

    /// Transform run on every new capture
    pub on_capture: Option<Transform>,

    /// Bindings layered over the defaults, in file order; `None` unbinds
    pub keys: Vec<(KeyChord, Option<Action>)>,

    pub logging: LoggingConfig,
}

impl Config {
    /// Built-in defaults for a given config directory
    pub fn with_dir(config_dir: PathBuf) -> Self {
        let logging = LoggingConfig::for_config_dir(&config_dir);
        Self {
            config_dir,
            buffer_size: DEFAULT_BUFFER_SIZE,
            leave_crlf: false,
            editor: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            persist_history: false,
            on_capture: None,
            keys: Vec::new(),
            logging,
        }
    }

    /// Default bindings with this config's `[keys]` applied
    pub fn key_table(&self) -> KeyDispatcher {
        let mut table = KeyDispatcher::with_default_config();
        for (key, action) in &self.keys {
            table.register(*key, action.clone());
        }
        table
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILENAME)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::with_dir(default_config_dir())
    }
}

/// `~/.clipz`, or `./.clipz` when there's no home directory
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".clipz"))
        .unwrap_or_else(|| PathBuf::from(".clipz"))
}

/// Expand a leading `~/` to the home directory
pub(crate) fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if path == "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub buffer_size: Option<usize>,
    pub leave_crlf: Option<bool>,
    pub editor: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub persist_history: Option<bool>,

    /// Transform for every new capture, same shape as a key binding
    pub on_capture: Option<BindingSpec>,

    /// Optional [keys] section
    #[serde(default)]
    pub keys: BTreeMap<String, BindingSpec>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_dir: Option<PathBuf>,
    pub buffer_size: Option<usize>,
    /// `--leavecrlf` can only switch normalization off
    pub leave_crlf: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Write a commented default config.toml if none exists
    ///
    /// Helps users discover the options. Failures are ignored, the config
    /// file is optional.
    pub fn ensure_config_exists(&self) {
        let path = self.config_path();
        if path.exists() {
            return;
        }
        if std::fs::create_dir_all(&self.config_dir).is_err() {
            return;
        }
        let template = Self::with_dir(self.config_dir.clone()).to_toml();
        let _ = std::fs::write(&path, template);
    }

    /// Read and parse the config file
    ///
    /// A missing file gives defaults. An unreadable or malformed file is
    /// reported on stderr and also gives defaults: losing the clipboard
    /// history over a typo would be worse than running with stock settings.
    fn load_file_config(path: &Path) -> FileConfig {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return FileConfig::default(),
            Err(e) => {
                eprintln!("clipz: cannot read {}: {}", path.display(), e);
                eprintln!("clipz: continuing with default settings");
                return FileConfig::default();
            }
        };

        match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("clipz: failed to parse {}", path.display());
                eprintln!("{}", e);
                eprintln!("clipz: continuing with default settings");
                FileConfig::default()
            }
        }
    }

    /// Load configuration: CLI > file > defaults
    pub fn load(overrides: &Overrides) -> Self {
        let config_dir = overrides
            .config_dir
            .clone()
            .unwrap_or_else(default_config_dir);
        let file = Self::load_file_config(&config_dir.join(CONFIG_FILENAME));
        let editor_env = std::env::var("EDITOR").ok();
        Self::resolve(config_dir, file, overrides, editor_env)
    }

    /// Combine the layers. Problems with individual entries are reported on
    /// stderr and the entry is skipped.
    fn resolve(
        config_dir: PathBuf,
        file: FileConfig,
        overrides: &Overrides,
        editor_env: Option<String>,
    ) -> Self {
        let defaults = Self::with_dir(config_dir.clone());

        let buffer_size = overrides
            .buffer_size
            .or(file.buffer_size)
            .unwrap_or(defaults.buffer_size)
            .max(1);

        let leave_crlf = overrides.leave_crlf || file.leave_crlf.unwrap_or(defaults.leave_crlf);

        let editor = file
            .editor
            .or(editor_env)
            .filter(|e| !e.trim().is_empty());

        let poll_interval_ms = file
            .poll_interval_ms
            .unwrap_or(defaults.poll_interval_ms)
            .max(1);

        let persist_history = file.persist_history.unwrap_or(defaults.persist_history);

        let on_capture = file.on_capture.and_then(|spec| match spec.to_transform() {
            Ok(transform) => Some(transform),
            Err(e) => {
                eprintln!("clipz: ignoring on_capture: {}", e);
                None
            }
        });

        let (keys, warnings) = parse_bindings(&file.keys);
        for warning in warnings {
            eprintln!("clipz: ignoring {}", warning);
        }

        let logging = LoggingConfig::from_file(file.logging, &config_dir);

        Self {
            config_dir,
            buffer_size,
            leave_crlf,
            editor,
            poll_interval_ms,
            persist_history,
            on_capture,
            keys,
            logging,
        }
    }
}
