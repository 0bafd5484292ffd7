use crate::{EngineError, Position};
use std::collections::HashMap;

/// Cell state as visible to the player. Mine locations are not part of the
/// snapshot: the engine works from exactly the information a player has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Hidden,
    /// Count of adjacent mines, fixed at reveal time. Always 0..=8.
    Revealed(u8),
    /// Treated as a known mine when building constraints.
    Flagged,
}

/// Immutable snapshot of a partially revealed board.
///
/// Built once per query; the engine never mutates it. `total_mines` is
/// optional and only acts as a global constraint when present.
#[derive(Debug, Clone)]
pub struct Board {
    cells: HashMap<Position, Cell>,
    width: u32,
    height: u32,
    total_mines: Option<u32>,
}

impl Board {
    pub fn new(width: u32, height: u32) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }

        let mut cells = HashMap::with_capacity((width * height) as usize);
        for row in 0..height as i32 {
            for col in 0..width as i32 {
                cells.insert(Position::new(row, col), Cell::Hidden);
            }
        }

        Ok(Board {
            cells,
            width,
            height,
            total_mines: None,
        })
    }

    pub fn with_total_mines(mut self, mines: u32) -> Self {
        self.total_mines = Some(mines);
        self
    }

    /// Parses a snapshot from row-major text: `.` hidden, `F` flagged,
    /// `0`-`8` revealed counts. Whitespace-only lines are skipped.
    pub fn from_ascii(text: &str) -> Result<Self, EngineError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |row| row.chars().count()) as u32;
        let mut board = Board::new(width, height)?;

        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let pos = Position::new(row as i32, col as i32);
                match ch {
                    '.' => {}
                    'F' => board.flag(pos)?,
                    '0'..='8' => board.reveal(pos, ch as u8 - b'0')?,
                    _ => return Err(EngineError::OutOfBounds(pos)),
                }
            }
        }

        Ok(board)
    }

    pub fn reveal(&mut self, pos: Position, count: u8) -> Result<(), EngineError> {
        if count > 8 {
            return Err(EngineError::CountOutOfRange { pos, count });
        }
        self.set(pos, Cell::Revealed(count))
    }

    pub fn flag(&mut self, pos: Position) -> Result<(), EngineError> {
        self.set(pos, Cell::Flagged)
    }

    fn set(&mut self, pos: Position, cell: Cell) -> Result<(), EngineError> {
        if !self.is_within_bounds(pos) {
            return Err(EngineError::OutOfBounds(pos));
        }
        self.cells.insert(pos, cell);
        Ok(())
    }

    pub fn is_within_bounds(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.row < self.height as i32 && pos.col >= 0 && pos.col < self.width as i32
    }

    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.cells.get(&pos).copied()
    }

    /// In-bounds 8-neighborhood of a position.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        pos.neighbors().filter(move |p| self.is_within_bounds(*p))
    }

    /// All positions in row-major order.
    pub fn iter_positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width as i32;
        (0..self.height as i32)
            .flat_map(move |row| (0..width).map(move |col| Position::new(row, col)))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn total_mines(&self) -> Option<u32> {
        self.total_mines
    }

    pub fn hidden_count(&self) -> u32 {
        self.cells
            .values()
            .filter(|cell| matches!(cell, Cell::Hidden))
            .count() as u32
    }

    pub fn flagged_count(&self) -> u32 {
        self.cells
            .values()
            .filter(|cell| matches!(cell, Cell::Flagged))
            .count() as u32
    }
}
