//! Tetromino (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so binaries, integration
//! tests, and benches can use `tetromino::{core, driver, types}`.

pub use tetromino_core as core;
pub use tetromino_driver as driver;
pub use tetromino_types as types;
