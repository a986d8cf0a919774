//! Deterministic maze simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - No wall-clock reads outside `seed_from_clock`
//! - No platform dependencies

pub mod generator;
pub mod grid;
pub mod movement;
pub mod solver;

pub use generator::{MIN_CELLS, check_dimensions, generate, seed_from_clock};
pub use grid::{Cell, Direction, Maze, Position};
pub use movement::{CellEffect, MoveOutcome, move_token};
pub use solver::{next_step, reachable_count, shortest_path};
