//! Seeded perfect-maze generation
//!
//! Randomized depth-first search with an explicit stack, followed by
//! rejection-sampled placement of the special cells. The same seed and
//! dimensions always yield the same maze.

use rand::Rng;
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::grid::{Direction, Maze, Position};
use crate::consts::{BOMB_CELLS, BONUS_CELLS};
use crate::error::MazeError;

/// Smallest grid that can hold start, end and every bonus/bomb cell
pub const MIN_CELLS: usize = 2 + BONUS_CELLS + BOMB_CELLS;

/// Check the grid can hold all special cells, so placement terminates
pub fn check_dimensions(rows: usize, cols: usize) -> Result<(), MazeError> {
    if rows == 0 || cols == 0 {
        return Err(MazeError::InvalidDimensions { rows, cols });
    }
    let cells = rows.saturating_mul(cols);
    if cells < MIN_CELLS {
        return Err(MazeError::GridTooSmall {
            rows,
            cols,
            cells,
            required: MIN_CELLS,
        });
    }
    Ok(())
}

/// Generate a maze for the given seed
pub fn generate(rows: usize, cols: usize, seed: u64) -> Result<Maze, MazeError> {
    check_dimensions(rows, cols)?;

    let mut rng = Pcg32::seed_from_u64(seed);
    let mut maze = Maze::new(rows, cols);
    carve_passages(&mut maze, &mut rng);
    place_special_cells(&mut maze, &mut rng);

    log::debug!("Generated {rows}x{cols} maze (seed {seed})");
    Ok(maze)
}

/// Seed derived from wall-clock milliseconds, for a fresh maze each run
pub fn seed_from_clock() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

fn carve_passages(maze: &mut Maze, rng: &mut Pcg32) {
    let mut visited = vec![vec![false; maze.cols()]; maze.rows()];
    let mut stack = vec![Position::START];
    visited[0][0] = true;

    // Reused across iterations; at most four candidates
    let mut candidates: Vec<Direction> = Vec::with_capacity(4);

    while let Some(&current) = stack.last() {
        candidates.clear();
        candidates.extend(Direction::ALL.into_iter().filter(|&dir| {
            maze.neighbor(current, dir)
                .is_some_and(|next| !visited[next.row][next.col])
        }));

        match candidates.choose(rng) {
            Some(&dir) => {
                maze.carve(current, dir);
                if let Some(next) = maze.neighbor(current, dir) {
                    visited[next.row][next.col] = true;
                    stack.push(next);
                }
            }
            None => {
                stack.pop();
            }
        }
    }
}

fn place_special_cells(maze: &mut Maze, rng: &mut Pcg32) {
    let start = maze.start();
    let end = maze.end();
    maze.cell_mut(start).is_start = true;
    maze.cell_mut(end).is_end = true;

    for _ in 0..BONUS_CELLS {
        let pos = random_free_cell(maze, rng);
        maze.cell_mut(pos).is_extra_point = true;
    }
    for _ in 0..BOMB_CELLS {
        let pos = random_free_cell(maze, rng);
        maze.cell_mut(pos).is_bomb = true;
    }
}

/// Resample until a roleless cell comes up; `check_dimensions` guarantees one exists
fn random_free_cell(maze: &Maze, rng: &mut Pcg32) -> Position {
    loop {
        let pos = Position::new(
            rng.random_range(0..maze.rows()),
            rng.random_range(0..maze.cols()),
        );
        if !maze.cell(pos).has_role() {
            return pos;
        }
    }
}
