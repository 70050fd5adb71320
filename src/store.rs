//! Save slot for the garden: one JSON blob, replaced whole on every save.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("save file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("save data is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The persisted part of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    pub water_level: f64,
    pub tree_age: u64,
    /// Older saves called this `lastLoginTime`
    #[serde(default, alias = "lastLoginTime")]
    pub last_checkpoint_time: Option<i64>,
}

pub trait SaveStore {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<SavedState>, StoreError>;
    fn save(&mut self, state: &SavedState) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Saves to a JSON file on disk
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("treecare")
            .join("save.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SaveStore for JsonFileStore {
    fn load(&self) -> Result<Option<SavedState>, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn save(&mut self, state: &SavedState) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
            }
        }

        let json = serde_json::to_string_pretty(state)?;
        // Write to a temp file first, then rename over the slot
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Keeps the slot in memory only; nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Option<SavedState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn load(&self) -> Result<Option<SavedState>, StoreError> {
        Ok(self.slot)
    }

    fn save(&mut self, state: &SavedState) -> Result<(), StoreError> {
        self.slot = Some(*state);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.slot = None;
        Ok(())
    }
}
