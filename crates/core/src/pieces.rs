//! Pieces module - tetromino geometry and the active falling piece
//!
//! Each kind owns a fixed table of rotation states; each state is four
//! `(dx, dy)` offsets from the piece anchor inside a 4x4 bounding box.
//! Rotation advances the state index and wraps. There is no wall kick: a
//! rotated piece that collides is rejected by the engine as-is.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::types::{PieceKind, Position, RotationDirection};

/// Offset of a single mino relative to piece anchor, as (dx, dy)
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece anchor
pub type PieceShape = [MinoOffset; 4];

const I_STATES: [PieceShape; 4] = [
    [(0, 1), (1, 1), (2, 1), (3, 1)],
    [(2, 0), (2, 1), (2, 2), (2, 3)],
    [(0, 2), (1, 2), (2, 2), (3, 2)],
    [(1, 0), (1, 1), (1, 2), (1, 3)],
];

// The square looks the same in every orientation, so it has a single state.
const O_STATES: [PieceShape; 1] = [[(1, 0), (2, 0), (1, 1), (2, 1)]];

const T_STATES: [PieceShape; 4] = [
    [(1, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (1, 1), (2, 1), (1, 2)],
    [(0, 1), (1, 1), (2, 1), (1, 2)],
    [(1, 0), (0, 1), (1, 1), (1, 2)],
];

const S_STATES: [PieceShape; 4] = [
    [(1, 0), (2, 0), (0, 1), (1, 1)],
    [(1, 0), (1, 1), (2, 1), (2, 2)],
    [(1, 1), (2, 1), (0, 2), (1, 2)],
    [(0, 0), (0, 1), (1, 1), (1, 2)],
];

const Z_STATES: [PieceShape; 4] = [
    [(0, 0), (1, 0), (1, 1), (2, 1)],
    [(2, 0), (1, 1), (2, 1), (1, 2)],
    [(0, 1), (1, 1), (1, 2), (2, 2)],
    [(1, 0), (0, 1), (1, 1), (0, 2)],
];

const J_STATES: [PieceShape; 4] = [
    [(0, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (2, 0), (1, 1), (1, 2)],
    [(0, 1), (1, 1), (2, 1), (2, 2)],
    [(1, 0), (1, 1), (0, 2), (1, 2)],
];

const L_STATES: [PieceShape; 4] = [
    [(2, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (1, 1), (1, 2), (2, 2)],
    [(0, 1), (1, 1), (2, 1), (0, 2)],
    [(0, 0), (1, 0), (1, 1), (1, 2)],
];

/// Width of the bounding box every rotation table is laid out in
pub const BOUNDING_BOX: i16 = 4;

/// Row of the anchor when a piece spawns
pub const SPAWN_ROW: i16 = 0;

/// All rotation states of a kind, in clockwise order
pub fn rotation_states(kind: PieceKind) -> &'static [PieceShape] {
    match kind {
        PieceKind::I => &I_STATES,
        PieceKind::O => &O_STATES,
        PieceKind::T => &T_STATES,
        PieceKind::S => &S_STATES,
        PieceKind::Z => &Z_STATES,
        PieceKind::J => &J_STATES,
        PieceKind::L => &L_STATES,
    }
}

/// Number of distinct rotation states of a kind
pub fn rotation_count(kind: PieceKind) -> usize {
    rotation_states(kind).len()
}

/// Get the shape for a kind and rotation index (wrapping)
pub fn get_shape(kind: PieceKind, rotation: usize) -> PieceShape {
    let states = rotation_states(kind);
    states[rotation % states.len()]
}

/// Anchor column that centers the bounding box on a board of `width`
pub fn spawn_col(width: u16) -> i16 {
    (width as i16 - BOUNDING_BOX) / 2
}

/// The currently falling piece.
///
/// Movement helpers return candidates and never mutate; the engine checks a
/// candidate against the grid before committing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivePiece {
    pub kind: PieceKind,
    /// Index into [`rotation_states`] for `kind`
    pub rotation: usize,
    /// Anchor row (top of the bounding box)
    pub row: i16,
    /// Anchor column (left of the bounding box)
    pub col: i16,
}

impl ActivePiece {
    /// Piece in rotation state 0 at the top center of a board of `width`
    pub fn spawn(kind: PieceKind, width: u16) -> Self {
        Self {
            kind,
            rotation: 0,
            row: SPAWN_ROW,
            col: spawn_col(width),
        }
    }

    pub fn anchor(&self) -> Position {
        Position::new(self.row, self.col)
    }

    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute grid coordinates covered by this piece
    pub fn occupied_cells(&self) -> [Position; 4] {
        self.shape()
            .map(|(dx, dy)| Position::new(self.row + dy as i16, self.col + dx as i16))
    }

    /// Candidate with the rotation state advanced one step
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        let count = rotation_count(self.kind);
        let rotation = match direction {
            RotationDirection::Clockwise => (self.rotation + 1) % count,
            RotationDirection::CounterClockwise => (self.rotation + count - 1) % count,
        };
        Self { rotation, ..*self }
    }

    /// Candidate moved by the given deltas
    pub fn translated(&self, delta_row: i16, delta_col: i16) -> Self {
        Self {
            row: self.row + delta_row,
            col: self.col + delta_col,
            ..*self
        }
    }

    /// Check if all minos are at free positions on the grid
    pub fn fits(&self, grid: &Grid) -> bool {
        grid.fits(&self.occupied_cells())
    }

    /// Check if the piece is resting on the stack or the floor
    pub fn is_grounded(&self, grid: &Grid) -> bool {
        !self.translated(1, 0).fits(grid)
    }
}
