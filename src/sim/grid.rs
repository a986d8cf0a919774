//! Maze data model
//!
//! Plain value types: the session owns one `Maze` and mutates it only
//! through the movement engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MazeError;

/// Tilt / movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Neighbor listing order used by the carver (N, S, W, E)
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Row/column delta for one step
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

/// Grid coordinate of the token (row-major, origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const START: Position = Position { row: 0, col: 0 };

    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One grid unit: four walls plus role flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
    pub is_start: bool,
    /// Goal cell (one-shot)
    pub is_end: bool,
    /// Bonus cell (one-shot)
    pub is_extra_point: bool,
    /// Penalty cell (one-shot)
    pub is_bomb: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            north: true,
            south: true,
            east: true,
            west: true,
            is_start: false,
            is_end: false,
            is_extra_point: false,
            is_bomb: false,
        }
    }
}

impl Cell {
    pub fn has_wall(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.north,
            Direction::Down => self.south,
            Direction::Left => self.west,
            Direction::Right => self.east,
        }
    }

    fn set_wall(&mut self, dir: Direction, present: bool) {
        match dir {
            Direction::Up => self.north = present,
            Direction::Down => self.south = present,
            Direction::Left => self.west = present,
            Direction::Right => self.east = present,
        }
    }

    /// True if any role flag is set
    pub fn has_role(&self) -> bool {
        self.is_start || self.is_end || self.is_extra_point || self.is_bomb
    }

    fn glyph(&self) -> char {
        if self.is_end {
            'E'
        } else if self.is_extra_point {
            '$'
        } else if self.is_bomb {
            '*'
        } else if self.is_start {
            'S'
        } else {
            ' '
        }
    }
}

/// Rectangular grid of cells, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MazeData")]
pub struct Maze {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

/// Unchecked wire form of a `Maze`
#[derive(Deserialize)]
struct MazeData {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl TryFrom<MazeData> for Maze {
    type Error = MazeError;

    fn try_from(data: MazeData) -> Result<Self, Self::Error> {
        let expected = data.rows.checked_mul(data.cols).unwrap_or(usize::MAX);
        if data.cells.len() != expected {
            return Err(MazeError::CellCountMismatch {
                rows: data.rows,
                cols: data.cols,
                expected,
                found: data.cells.len(),
            });
        }
        Ok(Self {
            rows: data.rows,
            cols: data.cols,
            cells: data.cells,
        })
    }
}

impl Maze {
    /// Fully walled grid with no roles
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    fn index(&self, pos: Position) -> usize {
        debug_assert!(self.contains(pos), "{pos} outside {}x{}", self.rows, self.cols);
        pos.row * self.cols + pos.col
    }

    /// Cell at `pos`; panics if out of bounds
    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[self.index(pos)]
    }

    pub(crate) fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        let idx = self.index(pos);
        &mut self.cells[idx]
    }

    /// In-bounds neighbor in `dir`, ignoring walls
    pub fn neighbor(&self, pos: Position, dir: Direction) -> Option<Position> {
        let (dr, dc) = dir.offset();
        let row = pos.row.checked_add_signed(dr)?;
        let col = pos.col.checked_add_signed(dc)?;
        let next = Position::new(row, col);
        self.contains(next).then_some(next)
    }

    /// Whether the token at `pos` may step in `dir`
    pub fn can_move(&self, pos: Position, dir: Direction) -> bool {
        self.contains(pos)
            && !self.cell(pos).has_wall(dir)
            && self.neighbor(pos, dir).is_some()
    }

    /// Remove the wall pair between `pos` and its neighbor in `dir`
    pub(crate) fn carve(&mut self, pos: Position, dir: Direction) {
        if let Some(next) = self.neighbor(pos, dir) {
            self.cell_mut(pos).set_wall(dir, false);
            self.cell_mut(next).set_wall(dir.opposite(), false);
        }
    }

    pub fn start(&self) -> Position {
        Position::START
    }

    pub fn end(&self) -> Position {
        Position::new(self.rows.saturating_sub(1), self.cols.saturating_sub(1))
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.cols).map(move |col| Position::new(row, col)))
    }

    pub fn count_cells(&self, pred: impl Fn(&Cell) -> bool) -> usize {
        self.cells.iter().filter(|c| pred(c)).count()
    }

    /// Number of open passages between adjacent cells
    pub fn passage_count(&self) -> usize {
        self.positions()
            .map(|pos| {
                [Direction::Down, Direction::Right]
                    .into_iter()
                    .filter(|&dir| self.can_move(pos, dir))
                    .count()
            })
            .sum()
    }

    /// Copy the role flags of `other` onto this maze, keeping walls
    pub(crate) fn restore_roles(&mut self, other: &Maze) {
        for (cell, src) in self.cells.iter_mut().zip(&other.cells) {
            cell.is_start = src.is_start;
            cell.is_end = src.is_end;
            cell.is_extra_point = src.is_extra_point;
            cell.is_bomb = src.is_bomb;
        }
    }

    /// ASCII rendering with the token drawn at `token`
    pub fn render_with_token(&self, token: Option<Position>) -> String {
        if self.is_empty() {
            return String::new();
        }
        let mut out = String::with_capacity((self.cols * 3 + 2) * (self.rows * 2 + 1));
        for row in 0..self.rows {
            for col in 0..self.cols {
                out.push('+');
                let wall = self.cell(Position::new(row, col)).north;
                out.push_str(if wall { "--" } else { "  " });
            }
            out.push_str("+\n");
            for col in 0..self.cols {
                let pos = Position::new(row, col);
                let cell = self.cell(pos);
                out.push(if cell.west { '|' } else { ' ' });
                out.push(if token == Some(pos) { 'o' } else { cell.glyph() });
                out.push(' ');
            }
            let last_east = self.cols > 0 && self.cell(Position::new(row, self.cols - 1)).east;
            out.push(if last_east { '|' } else { ' ' });
            out.push('\n');
        }
        for col in 0..self.cols {
            out.push('+');
            let wall = self.cell(Position::new(self.rows - 1, col)).south;
            out.push_str(if wall { "--" } else { "  " });
        }
        out.push('+');
        out
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with_token(None))
    }
}
