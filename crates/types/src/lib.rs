//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no behavior beyond conversions, making them
//! usable from the engine, the driver, and any external consumer of events.
//!
//! # Board Dimensions
//!
//! The default playfield is 10 columns by 20 rows. Coordinates are
//! `(row, col)` with row 0 at the top and column 0 at the left.
//! Other sizes are chosen per game through [`BoardSize`].
//!
//! # Difficulty and Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_INTERVAL_MS` | 1000 | Gravity interval at level 1 |
//! | `INTERVAL_STEP_MS` | 75 | Interval reduction per level above 1 |
//! | `DEFAULT_MIN_INTERVAL_MS` | 100 | Default floor for the gravity interval |
//! | `LINES_PER_LEVEL` | 5 | Lines cleared per level increase |
//! | `LINE_SCORE` | 100 | Points per line for 1-3 line clears |
//! | `FOUR_LINE_SCORE` | 800 | Points for clearing four lines at once |
//!
//! # Examples
//!
//! ```
//! use tetromino_types::{BoardSize, GameAction, PieceKind};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(PieceKind::T.as_char(), 'T');
//!
//! let action = GameAction::from_str("hardDrop").unwrap();
//! assert_eq!(action, GameAction::HardDrop);
//!
//! let size = BoardSize::parse("15 x 30").unwrap();
//! assert_eq!((size.width, size.height), (15, 30));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default board width in cells
pub const DEFAULT_WIDTH: u16 = 10;

/// Default board height in cells
pub const DEFAULT_HEIGHT: u16 = 20;

/// Smallest accepted width (the horizontal I piece must fit)
pub const MIN_WIDTH: u16 = 4;

/// Smallest accepted height (the vertical I piece must fit)
pub const MIN_HEIGHT: u16 = 4;

/// Largest accepted width or height
pub const MAX_DIMENSION: u16 = 256;

/// Gravity interval at level 1
pub const BASE_INTERVAL_MS: u32 = 1000;

/// Gravity interval reduction per level
pub const INTERVAL_STEP_MS: u32 = 75;

/// Default floor for the gravity interval
pub const DEFAULT_MIN_INTERVAL_MS: u32 = 100;

/// Lines needed for each level increase
pub const LINES_PER_LEVEL: u32 = 5;

/// Points per cleared line when 1-3 lines clear at once
pub const LINE_SCORE: u32 = 100;

/// Points for a four line clear
pub const FOUR_LINE_SCORE: u32 = 800;

/// The seven tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// Every kind, in canonical order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
    }

    /// Parse piece kind from its letter (case-insensitive)
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Uppercase letter used in the textual board rendering
    pub fn as_char(&self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Direction of a rotation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Absolute grid coordinate. Row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i16,
    pub col: i16,
}

impl Position {
    pub const fn new(row: i16, col: i16) -> Self {
        Self { row, col }
    }

    /// Position shifted by the given deltas
    pub const fn offset(self, delta_row: i16, delta_col: i16) -> Self {
        Self {
            row: self.row + delta_row,
            col: self.col + delta_col,
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled by a locked block of that kind
pub type Cell = Option<PieceKind>;

/// Lifecycle of a single game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameStatus {
    Active,
    Paused,
    GameOver,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Paused => "paused",
            GameStatus::GameOver => "gameOver",
        }
    }

    /// Whether movement operations are honored in this state
    pub fn is_playable(&self) -> bool {
        matches!(self, GameStatus::Active)
    }
}

/// Board dimensions for one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSize {
    pub width: u16,
    pub height: u16,
}

impl BoardSize {
    /// Sizes offered by the classic size menu
    pub const PRESETS: [BoardSize; 3] = [
        BoardSize::new(10, 20),
        BoardSize::new(15, 15),
        BoardSize::new(15, 30),
    ];

    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Parse `"W x H"` (spaces and letter case optional)
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let (w, h) = lower.split_once('x')?;
        let width = w.trim().parse().ok()?;
        let height = h.trim().parse().ok()?;
        Some(Self { width, height })
    }

    /// Number of cells on a board of this size
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

/// Player or host intents that can be applied to the engine
///
/// Input handling maps raw key events to these; the engine never sees keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down, locking it if blocked
    SoftDrop,
    /// Drop piece to the lowest valid position and lock it
    HardDrop,
    /// Rotate piece clockwise
    RotateCw,
    /// Rotate piece counter-clockwise
    RotateCcw,
    /// Pause if active, resume if paused
    TogglePause,
    /// Start a fresh game on the current board size
    NewGame,
    /// Force the current game to end
    EndGame,
}

impl GameAction {
    /// Parse action from string (case-insensitive camelCase)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "togglepause" | "pause" => Some(GameAction::TogglePause),
            "newgame" => Some(GameAction::NewGame),
            "endgame" => Some(GameAction::EndGame),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::TogglePause => "togglePause",
            GameAction::NewGame => "newGame",
            GameAction::EndGame => "endGame",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_defaults() {
        assert_eq!(BASE_INTERVAL_MS, 1000);
        assert_eq!(INTERVAL_STEP_MS, 75);
        assert_eq!(LINES_PER_LEVEL, 5);
        assert_eq!(LINE_SCORE, 100);
        assert_eq!(FOUR_LINE_SCORE, 800);
        assert!(DEFAULT_MIN_INTERVAL_MS > 0);
    }

    #[test]
    fn piece_kind_char_roundtrip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
            assert_eq!(PieceKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('x'), None);
    }

    #[test]
    fn board_size_parse() {
        assert_eq!(BoardSize::parse("10 x 20"), Some(BoardSize::new(10, 20)));
        assert_eq!(BoardSize::parse("15x15"), Some(BoardSize::new(15, 15)));
        assert_eq!(BoardSize::parse(" 15 X 30 "), Some(BoardSize::new(15, 30)));
        assert_eq!(BoardSize::parse("15"), None);
        assert_eq!(BoardSize::parse("a x 3"), None);
        assert_eq!(BoardSize::PRESETS[0], BoardSize::default());
        assert_eq!(BoardSize::new(15, 30).to_string(), "15 x 30");
    }

    #[test]
    fn game_action_parse() {
        assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
        assert_eq!(GameAction::from_str("ROTATECCW"), Some(GameAction::RotateCcw));
        assert_eq!(GameAction::from_str("newGame"), Some(GameAction::NewGame));
        assert_eq!(GameAction::from_str("jump"), None);
        assert_eq!(GameAction::TogglePause.as_str(), "togglePause");
    }
}
