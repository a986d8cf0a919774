//! Token movement and cell-effect scoring

use serde::{Deserialize, Serialize};

use super::grid::{Direction, Maze, Position};
use crate::consts::{BOMB_PENALTY, BONUS_POINTS, GOAL_POINTS};

/// One-shot effect triggered by entering a special cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellEffect {
    Bonus,
    Bomb,
    /// Goal reached; carries the points granted including time bonus
    Goal { points: i32 },
}

/// Result of a single move request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub position: Position,
    /// False when a wall or the grid edge blocked the move
    pub moved: bool,
    pub score_delta: i32,
    pub terminal: bool,
    pub effects: Vec<CellEffect>,
}

/// Step the token from `pos` in `dir` and apply the landing cell's effects.
///
/// A blocked move leaves the position unchanged but still inspects the
/// current cell. Effects are applied in bonus, bomb, goal order and each
/// flag is cleared once triggered. A `pos` outside the grid is a no-op.
pub fn move_token(
    maze: &mut Maze,
    pos: Position,
    dir: Direction,
    remaining_secs: u32,
) -> MoveOutcome {
    if !maze.contains(pos) {
        log::warn!("Move {} from {pos} outside the grid ignored", dir.as_str());
        return MoveOutcome {
            position: pos,
            moved: false,
            score_delta: 0,
            terminal: false,
            effects: Vec::new(),
        };
    }

    let target = if maze.can_move(pos, dir) {
        maze.neighbor(pos, dir)
    } else {
        None
    };
    let position = target.unwrap_or(pos);

    let mut score_delta = 0;
    let mut terminal = false;
    let mut effects = Vec::new();

    let cell = maze.cell_mut(position);
    if cell.is_extra_point {
        cell.is_extra_point = false;
        score_delta += BONUS_POINTS;
        effects.push(CellEffect::Bonus);
    }
    if cell.is_bomb {
        cell.is_bomb = false;
        score_delta += BOMB_PENALTY;
        effects.push(CellEffect::Bomb);
    }
    if cell.is_end {
        cell.is_end = false;
        let bonus = i32::try_from(remaining_secs).unwrap_or(i32::MAX);
        let points = GOAL_POINTS.saturating_add(bonus);
        score_delta = score_delta.saturating_add(points);
        terminal = true;
        effects.push(CellEffect::Goal { points });
    }

    log::debug!(
        "Move {} {} -> {} (delta {score_delta})",
        dir.as_str(),
        pos,
        position
    );

    MoveOutcome {
        position,
        moved: target.is_some(),
        score_delta,
        terminal,
        effects,
    }
}
