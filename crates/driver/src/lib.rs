//! Async host for the board engine.
//!
//! The engine itself is synchronous and clock-free. This crate wraps it for a
//! tokio runtime:
//!
//! - [`SharedEngine`] serializes calls behind a mutex and re-broadcasts the
//!   events each call queues.
//! - [`GravityDriver`] is a task that soft-drops the active piece once per
//!   gravity interval until the game ends or it is told to stop.

pub mod gravity;
pub mod shared;

pub use tetromino_core as core;
pub use tetromino_types as types;

pub use gravity::GravityDriver;
pub use shared::{SharedEngine, DEFAULT_EVENT_CAPACITY};
