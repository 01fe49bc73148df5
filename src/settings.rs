//! Game settings and preferences
//!
//! Loaded once at startup from a JSON file. Settings are fixed for the
//! lifetime of a [`crate::Game`]; changing them means building a new one.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{SPAWN_MAX_TICKS, SPAWN_MIN_TICKS};
use crate::input::CommandBindings;
use crate::perception::PerceptionConfig;
use crate::sim::Difficulty;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("settings file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty of the first run
    pub difficulty: Difficulty,
    /// Spawn RNG seed; `None` picks one from the clock
    pub seed: Option<u64>,
    /// Inclusive spawn interval bounds (ticks)
    pub spawn_min_ticks: i32,
    pub spawn_max_ticks: i32,

    /// Gesture pipeline and inference policy
    pub perception: PerceptionConfig,
    /// Gesture → command table
    pub bindings: CommandBindings,

    /// Where the high score lives; `None` keeps it in memory
    pub high_score_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            seed: None,
            spawn_min_ticks: SPAWN_MIN_TICKS,
            spawn_max_ticks: SPAWN_MAX_TICKS,
            perception: PerceptionConfig::default(),
            bindings: CommandBindings::default(),
            high_score_path: None,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn read(path: &Path) -> Result<Self, SettingsError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::read(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{} ({}); using default settings", e, path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Seed to use for this session
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        })
    }
}
