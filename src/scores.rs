//! Score submission
//!
//! Sessions report their final score through [`ScoreSink`]. [`ScoreBook`] is
//! the local implementation: cumulative per-game totals plus the best runs,
//! persisted as JSON.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SubmitError;

/// Maximum number of best runs to keep
pub const MAX_BEST_RUNS: usize = 10;

/// Receives final scores; failures are reported, never retried by the caller
pub trait ScoreSink {
    fn submit(&mut self, game: &str, score: i32) -> Result<(), SubmitError>;
}

/// A single finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunEntry {
    pub game: String,
    pub score: i32,
}

/// Per-game totals and best runs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBook {
    /// Running total per game; each submission adds to it
    pub totals: BTreeMap<String, i64>,
    /// Best runs across games, sorted descending
    pub best_runs: Vec<RunEntry>,
    /// Save after each submission when set
    #[serde(skip)]
    autosave: Option<PathBuf>,
}

impl ScoreBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Book that writes itself to `path` after every submission
    pub fn with_autosave(mut self, path: impl Into<PathBuf>) -> Self {
        self.autosave = Some(path.into());
        self
    }

    pub fn total(&self, game: &str) -> i64 {
        self.totals.get(game).copied().unwrap_or(0)
    }

    /// Rank a score would achieve among the best runs (1-indexed)
    pub fn potential_rank(&self, score: i32) -> Option<usize> {
        let pos = self.best_runs.iter().position(|e| score > e.score);
        match pos {
            Some(i) => Some(i + 1),
            None if self.best_runs.len() < MAX_BEST_RUNS => Some(self.best_runs.len() + 1),
            None => None,
        }
    }

    /// Add a run; returns the rank achieved among best runs, if any
    pub fn record(&mut self, game: &str, score: i32) -> Option<usize> {
        *self.totals.entry(game.to_string()).or_insert(0) += i64::from(score);

        let rank = self.potential_rank(score)?;
        self.best_runs.insert(
            rank - 1,
            RunEntry {
                game: game.to_string(),
                score,
            },
        );
        self.best_runs.truncate(MAX_BEST_RUNS);
        Some(rank)
    }

    pub fn top_score(&self) -> Option<i32> {
        self.best_runs.first().map(|e| e.score)
    }

    /// Load from a JSON file; a missing file yields an empty book
    pub fn load(path: &Path) -> Result<Self, SubmitError> {
        if !path.exists() {
            log::info!("No score book at {}, starting fresh", path.display());
            return Ok(Self::new());
        }
        let json = fs::read_to_string(path)?;
        let book: ScoreBook = serde_json::from_str(&json)?;
        log::info!("Loaded score book ({} games)", book.totals.len());
        Ok(book)
    }

    pub fn save(&self, path: &Path) -> Result<(), SubmitError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Score book saved to {}", path.display());
        Ok(())
    }
}

impl ScoreSink for ScoreBook {
    fn submit(&mut self, game: &str, score: i32) -> Result<(), SubmitError> {
        if let Some(rank) = self.record(game, score) {
            log::info!("{game}: {score} points, rank #{rank}");
        }
        match &self.autosave {
            Some(path) => self.save(path),
            None => Ok(()),
        }
    }
}
