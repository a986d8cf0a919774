//! Error types
//!
//! The maze engine itself has no failure paths once its inputs are valid;
//! these cover precondition checks and the I/O around scores and settings.

use thiserror::Error;

/// Rejected maze or session parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("maze dimensions must be positive, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("a {rows}x{cols} grid has {cells} cells, need at least {required} for the roles")]
    GridTooSmall {
        rows: usize,
        cols: usize,
        cells: usize,
        required: usize,
    },
    #[error("time budget must be at least one second")]
    ZeroTimeBudget,
    #[error("a {rows}x{cols} maze needs {expected} cells, found {found}")]
    CellCountMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        found: usize,
    },
}

/// Failure reported by a score submission collaborator
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("score rejected: {0}")]
    Rejected(String),
    #[error("score store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("score store encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(#[from] MazeError),
}
