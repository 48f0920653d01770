// Storage module - persists clip lists to the config directory
//
// Each list is a single JSON array of strings. JSON escapes newlines and
// non-ASCII text, so any ordered sequence of clips survives a round trip
// exactly. Writes go to a sibling temp file first and are renamed into place,
// so a crash mid-write never leaves a truncated file behind.
//
// Persistence is best-effort: failures are logged and swallowed, and a
// missing or unreadable file loads as a single empty clip.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the saved list inside the config directory
pub const SAVED_FILENAME: &str = "saved_clips";

/// File name of the persisted capture history inside the config directory
pub const HISTORY_FILENAME: &str = "buffer";

/// A clip list stored as one JSON file
#[derive(Debug, Clone)]
pub struct ClipStore {
    dir: PathBuf,
    file_name: &'static str,
}

impl ClipStore {
    pub fn new(dir: impl Into<PathBuf>, file_name: &'static str) -> Self {
        Self {
            dir: dir.into(),
            file_name,
        }
    }

    /// Store for `<dir>/saved_clips`
    pub fn saved(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, SAVED_FILENAME)
    }

    /// Store for `<dir>/buffer`
    pub fn history(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, HISTORY_FILENAME)
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(self.file_name)
    }

    /// Write `clips`, creating the directory if needed. Errors are logged only.
    pub fn save(&self, clips: &[String]) {
        match self.try_save(clips) {
            Ok(()) => tracing::debug!("Saved {} clips to {:?}", clips.len(), self.path()),
            Err(e) => tracing::warn!("Could not save clips: {:#}", e),
        }
    }

    fn try_save(&self, clips: &[String]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let json = serde_json::to_string(clips).context("Failed to serialize clips")?;

        let path = self.path();
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to move {} into place", tmp.display()))?;
        Ok(())
    }

    /// Read the stored clips; missing or malformed data yields `[""]`
    pub fn load(&self) -> Vec<String> {
        match read_clips(&self.path()) {
            Ok(clips) if !clips.is_empty() => clips,
            Ok(_) => vec![String::new()],
            Err(e) => {
                tracing::debug!("No stored clips loaded: {:#}", e);
                vec![String::new()]
            }
        }
    }
}

fn read_clips(path: &Path) -> Result<Vec<String>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Malformed {}", path.display()))
}
