//! High score persistence
//!
//! The session reads the stored value once at startup and writes it back
//! every time a run beats it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("high score file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("high score file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Get/set of a single best score
pub trait HighScoreStore {
    fn get_high_score(&self) -> u64;
    fn set_high_score(&mut self, score: u64) -> Result<(), StoreError>;
}

/// Volatile store, for tests and sessions without a save location
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    score: u64,
}

impl MemoryStore {
    pub fn new(score: u64) -> Self {
        Self { score }
    }
}

impl HighScoreStore for MemoryStore {
    fn get_high_score(&self) -> u64 {
        self.score
    }

    fn set_high_score(&mut self, score: u64) -> Result<(), StoreError> {
        self.score = score;
        Ok(())
    }
}

/// On-disk record
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u64,
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    cached: u64,
}

impl JsonFileStore {
    /// Open the store, reading the current value if the file exists.
    ///
    /// A missing or unreadable file starts fresh at zero.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cached = match Self::read(&path) {
            Ok(Some(record)) => {
                let from = path.display();
                log::info!("Loaded high score {} from {}", record.high_score, from);
                record.high_score
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("Ignoring high score file {}: {}", path.display(), e);
                0
            }
        };
        Self { path, cached }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Result<Option<HighScoreRecord>, StoreError> {
        match fs::read_to_string(path) {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl HighScoreStore for JsonFileStore {
    fn get_high_score(&self) -> u64 {
        self.cached
    }

    fn set_high_score(&mut self, score: u64) -> Result<(), StoreError> {
        let json = serde_json::to_string(&HighScoreRecord { high_score: score })?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        // Write-then-rename so a crash never leaves a truncated file
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        self.cached = score;
        log::info!("High score {} saved", score);
        Ok(())
    }
}
