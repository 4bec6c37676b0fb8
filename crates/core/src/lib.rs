//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds the rules of a single falling-block board: the grid, the
//! seven tetrominoes, gravity, line clearing, scoring, and game over. It does
//! no I/O and owns no clock; a driver feeds it gravity ticks and player
//! intents, and consumers read snapshots and drained [`GameEvent`]s.
//!
//! # Module Structure
//!
//! - [`grid`]: cell matrix with collision checks and row compaction
//! - [`pieces`]: rotation tables and the active piece
//! - [`rng`]: seeded piece generator with a one-piece preview
//! - [`scoring`]: score, level, and gravity interval
//! - [`engine`]: the state machine tying it all together
//! - [`snapshot`]: read-only board views and text rendering
//! - [`events`]: change notifications
//! - [`config`]: board size, seed, and randomizer settings
//!
//! # Example
//!
//! ```
//! use tetromino_core::{BoardEngine, EngineConfig};
//! use tetromino_types::GameAction;
//!
//! let mut engine = BoardEngine::new(EngineConfig::default().with_seed(12345)).unwrap();
//! engine.new_game();
//!
//! engine.apply_action(GameAction::MoveRight);
//! engine.apply_action(GameAction::RotateCw);
//! engine.apply_action(GameAction::HardDrop);
//!
//! assert_eq!(engine.pieces_locked(), 1);
//! assert!(engine.drain_events().count() > 0);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod grid;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetromino_types as types;

pub use config::{parse_randomizer, parse_size, EngineConfig};
pub use engine::BoardEngine;
pub use error::ConfigError;
pub use events::GameEvent;
pub use grid::Grid;
pub use pieces::{get_shape, ActivePiece};
pub use rng::{PieceGenerator, Randomizer, SimpleRng};
pub use scoring::{ScoreSnapshot, ScoreTracker};
pub use snapshot::{render_preview, ActiveSnapshot, BoardSnapshot};
