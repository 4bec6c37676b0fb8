use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::pieces::{get_shape, ActivePiece};
use crate::types::{Cell, GameStatus, PieceKind, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: usize,
    pub row: i16,
    pub col: i16,
    pub cells: [Position; 4],
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            row: value.row,
            col: value.col,
            cells: value.occupied_cells(),
        }
    }
}

/// Everything a renderer needs to redraw the board.
///
/// `cells` merges the locked grid with the falling piece, row-major.
/// `Display` writes the classic text form: each row wrapped in `|`, one
/// letter per filled cell, and a closing `-` line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
    pub active: Option<ActiveSnapshot>,
    pub status: GameStatus,
}

impl BoardSnapshot {
    pub fn capture(grid: &Grid, active: Option<ActivePiece>, status: GameStatus) -> Self {
        let mut cells = grid.cells().to_vec();
        if let Some(piece) = active {
            for pos in piece.occupied_cells() {
                if pos.row >= 0 && pos.col >= 0 {
                    let idx = pos.row as usize * grid.width() as usize + pos.col as usize;
                    if let Some(cell) = cells.get_mut(idx) {
                        *cell = Some(piece.kind);
                    }
                }
            }
        }
        Self {
            width: grid.width(),
            height: grid.height(),
            cells,
            active: active.map(ActiveSnapshot::from),
            status,
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.height as usize || col >= self.width as usize {
            return None;
        }
        self.cells.get(row * self.width as usize + col).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }
}

impl fmt::Display for BoardSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            f.write_str("|")?;
            for cell in row {
                let c = cell.map_or(' ', |kind| kind.as_char());
                write!(f, "{c}")?;
            }
            f.write_str("|\n")?;
        }
        write!(f, "{}", "-".repeat(self.width as usize + 2))
    }
}

/// Text preview of a kind in its spawn orientation, boxed like the board
pub fn render_preview(kind: PieceKind) -> String {
    let shape = get_shape(kind, 0);
    let min_y = shape.iter().map(|&(_, dy)| dy).min().unwrap_or(0);
    let max_y = shape.iter().map(|&(_, dy)| dy).max().unwrap_or(0);

    let mut out = String::new();
    for y in min_y..=max_y {
        out.push('|');
        for x in 0..4 {
            let filled = shape.contains(&(x, y));
            out.push(if filled { kind.as_char() } else { ' ' });
        }
        out.push_str("|\n");
    }
    out.push_str("------");
    out
}
