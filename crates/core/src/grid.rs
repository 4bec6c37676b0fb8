//! Grid module - the matrix of locked cells
//!
//! The grid is a `width x height` matrix where each cell is empty or holds the
//! kind of the piece that locked there. Storage is a flat row-major vector so
//! row compaction is a series of `copy_within` calls.
//! Coordinates: `(row, col)` with row 0 at the top and column 0 at the left.
//! Anything outside the grid counts as occupied, so collision checks never
//! need a separate bounds test.

use crate::config::validate_size;
use crate::error::ConfigError;
use crate::types::{BoardSize, Cell, PieceKind, Position};

/// The settled board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u16,
    height: u16,
    /// Flat array of cells, row-major order (row * width + col)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid of the given size
    pub fn new(size: BoardSize) -> Result<Self, ConfigError> {
        validate_size(size)?;
        Ok(Self {
            width: size.width,
            height: size.height,
            cells: vec![None; size.area()],
        })
    }

    /// Build a grid from text rows, top to bottom.
    ///
    /// A piece letter marks an occupied cell, anything else is empty. Rows
    /// shorter than the widest row are padded with empty cells.
    pub fn from_rows(rows: &[&str]) -> Result<Self, ConfigError> {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let size = BoardSize::new(
            u16::try_from(width).unwrap_or(u16::MAX),
            u16::try_from(rows.len()).unwrap_or(u16::MAX),
        );
        let mut grid = Self::new(size)?;
        for (row, text) in rows.iter().enumerate() {
            for (col, c) in text.chars().enumerate() {
                grid.cells[row * width + col] = PieceKind::from_char(c);
            }
        }
        Ok(grid)
    }

    /// Calculate flat index from (row, col) coordinates
    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if pos.row < 0 || pos.col < 0 {
            return None;
        }
        let (row, col) = (pos.row as usize, pos.col as usize);
        if row >= self.height as usize || col >= self.width as usize {
            return None;
        }
        Some(row * self.width as usize + col)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn size(&self) -> BoardSize {
        BoardSize::new(self.width, self.height)
    }

    /// Get cell at position, `None` if out of bounds
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Set cell at position. Returns false if out of bounds
    pub fn set(&mut self, pos: Position, cell: Cell) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Whether the cell is filled or lies outside the grid
    pub fn is_occupied(&self, pos: Position) -> bool {
        !matches!(self.get(pos), Some(None))
    }

    /// Whether every position is inside the grid and empty
    pub fn fits(&self, cells: &[Position]) -> bool {
        cells.iter().all(|&pos| !self.is_occupied(pos))
    }

    /// Mark cells as occupied by `kind`.
    ///
    /// # Panics
    ///
    /// Panics if any cell is out of bounds or already occupied. The engine only
    /// places pieces it has already validated, so this indicates a bug.
    pub fn place(&mut self, cells: &[Position], kind: PieceKind) {
        for &pos in cells {
            assert!(
                !self.is_occupied(pos),
                "place {kind:?} at {pos:?}: cell is out of bounds or occupied"
            );
        }
        for &pos in cells {
            self.set(pos, Some(kind));
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        self.row(row)
            .is_some_and(|cells| cells.iter().all(|cell| cell.is_some()))
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        if row >= self.height as usize {
            return None;
        }
        let width = self.width as usize;
        let start = row * width;
        Some(&self.cells[start..start + width])
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// Remove every full row at once and compact the rest downward.
    ///
    /// Returns the cleared row indices in pre-shift coordinates, top to bottom.
    /// Rows above a cleared row move down by the number of cleared rows below
    /// them; vacated rows at the top become empty.
    pub fn clear_full_rows(&mut self) -> Vec<usize> {
        let mut cleared_rows = Vec::new();
        let width = self.width as usize;
        let mut write_row = self.height as usize;

        // Two pointers, scanning bottom to top
        for read_row in (0..self.height as usize).rev() {
            if self.is_row_full(read_row) {
                cleared_rows.push(read_row);
            } else {
                write_row -= 1;
                if write_row != read_row {
                    let src = read_row * width;
                    self.cells.copy_within(src..src + width, write_row * width);
                }
            }
        }

        self.cells[..write_row * width].fill(None);

        cleared_rows.reverse();
        cleared_rows
    }

    /// Count of filled cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Flat row-major view of all cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Empty every cell, keeping the dimensions
    pub fn reset(&mut self) {
        self.cells.fill(None);
    }

    /// Empty the grid with new dimensions
    pub fn reset_with_size(&mut self, size: BoardSize) -> Result<(), ConfigError> {
        *self = Self::new(size)?;
        Ok(())
    }
}

impl Default for Grid {
    fn default() -> Self {
        let size = BoardSize::default();
        Self {
            width: size.width,
            height: size.height,
            cells: vec![None; size.area()],
        }
    }
}
