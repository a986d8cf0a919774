//! Game settings
//!
//! Loaded from a JSON file next to the score book; absent files fall back
//! to the defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{MazeError, SettingsError};
use crate::sim::check_dimensions;

/// Maze and session tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Grid rows
    pub rows: usize,
    /// Grid columns
    pub cols: usize,
    /// Countdown at session start (seconds)
    pub time_budget_secs: u32,
    /// Countdown after a manual restart (seconds)
    pub restart_budget_secs: u32,
    /// Minimum spacing between accepted tilt moves
    pub debounce_ms: u64,
    /// Acceleration magnitude a tilt must exceed
    pub tilt_threshold: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: MAZE_ROWS,
            cols: MAZE_COLS,
            time_budget_secs: TIME_BUDGET_SECS,
            restart_budget_secs: TIME_BUDGET_SECS,
            debounce_ms: DEBOUNCE_MS,
            tilt_threshold: DEFAULT_TILT_THRESHOLD,
        }
    }
}

impl Settings {
    /// Default settings with a different grid size
    pub fn with_size(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), MazeError> {
        check_dimensions(self.rows, self.cols)?;
        if self.time_budget_secs == 0 || self.restart_budget_secs == 0 {
            return Err(MazeError::ZeroTimeBudget);
        }
        Ok(())
    }

    /// Load and validate settings; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            log::info!("Using default settings");
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
