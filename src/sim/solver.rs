//! Breadth-first path finding over open passages
//!
//! Drives the demo autopilot and backs the connectivity checks.

use std::collections::VecDeque;

use super::grid::{Direction, Maze, Position};

/// Shortest sequence of moves from `from` to `to`, or `None` if unreachable
pub fn shortest_path(maze: &Maze, from: Position, to: Position) -> Option<Vec<Direction>> {
    if !maze.contains(from) || !maze.contains(to) {
        return None;
    }

    // came_from[idx] = (previous cell, direction taken into idx)
    let idx = |p: Position| p.row * maze.cols() + p.col;
    let mut came_from: Vec<Option<(Position, Direction)>> = vec![None; maze.len()];
    let mut seen = vec![false; maze.len()];
    let mut queue = VecDeque::from([from]);
    seen[idx(from)] = true;

    while let Some(current) = queue.pop_front() {
        if current == to {
            break;
        }
        for dir in Direction::ALL {
            if !maze.can_move(current, dir) {
                continue;
            }
            let Some(next) = maze.neighbor(current, dir) else {
                continue;
            };
            if !seen[idx(next)] {
                seen[idx(next)] = true;
                came_from[idx(next)] = Some((current, dir));
                queue.push_back(next);
            }
        }
    }

    if !seen[idx(to)] {
        return None;
    }

    let mut path = Vec::new();
    let mut cursor = to;
    while let Some((prev, dir)) = came_from[idx(cursor)] {
        path.push(dir);
        cursor = prev;
    }
    path.reverse();
    Some(path)
}

/// First move toward the maze's end cell
pub fn next_step(maze: &Maze, from: Position) -> Option<Direction> {
    shortest_path(maze, from, maze.end())?.first().copied()
}

/// Number of cells reachable from `from`, including itself
pub fn reachable_count(maze: &Maze, from: Position) -> usize {
    if !maze.contains(from) {
        return 0;
    }
    let mut seen = vec![false; maze.len()];
    let mut stack = vec![from];
    seen[from.row * maze.cols() + from.col] = true;
    let mut count = 0;
    while let Some(current) = stack.pop() {
        count += 1;
        for dir in Direction::ALL {
            if !maze.can_move(current, dir) {
                continue;
            }
            if let Some(next) = maze.neighbor(current, dir) {
                let i = next.row * maze.cols() + next.col;
                if !seen[i] {
                    seen[i] = true;
                    stack.push(next);
                }
            }
        }
    }
    count
}
