//! Maze Escape - tilt-controlled maze minigame engine
//!
//! Core modules:
//! - `sim`: Deterministic maze generation, movement and scoring
//! - `input`: Tilt sample translation and debounce
//! - `session`: Timed session loop (countdown, pause, restart, end handling)
//! - `scores`: Score submission and the local score book
//! - `settings`: Data-driven session tuning

pub mod error;
pub mod input;
pub mod scores;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{MazeError, SettingsError, SubmitError};
pub use input::{Debouncer, TiltSample};
pub use scores::{ScoreBook, ScoreSink};
pub use session::{EndReason, GameSummary, Navigator, Session, SessionEvent, SessionPhase};
pub use settings::Settings;
pub use sim::{Direction, Maze, Position};

/// Game configuration constants
pub mod consts {
    /// Name the score is filed under
    pub const GAME_NAME: &str = "Maze Escape";

    /// Default grid size
    pub const MAZE_ROWS: usize = 15;
    pub const MAZE_COLS: usize = 15;

    /// Special cells placed in every maze
    pub const BONUS_CELLS: usize = 3;
    pub const BOMB_CELLS: usize = 2;

    /// Cell effects
    pub const BONUS_POINTS: i32 = 10;
    pub const BOMB_PENALTY: i32 = -2;
    /// Goal points before the remaining-seconds bonus
    pub const GOAL_POINTS: i32 = 50;

    /// Countdown at session start and after restart (seconds)
    pub const TIME_BUDGET_SECS: u32 = 180;

    /// Minimum spacing between accepted tilt moves
    pub const DEBOUNCE_MS: u64 = 200;
    /// Acceleration a tilt axis must exceed (m/s²)
    pub const DEFAULT_TILT_THRESHOLD: f32 = 3.0;
}
