//! Configuration errors reported at construction time.
//!
//! Illegal moves are not errors: they are rejected as no-ops by the engine.

use thiserror::Error;

use crate::types::{MAX_DIMENSION, MIN_HEIGHT, MIN_WIDTH};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board width {0} is outside {min}..={max}", min = MIN_WIDTH, max = MAX_DIMENSION)]
    InvalidWidth(u16),

    #[error("board height {0} is outside {min}..={max}", min = MIN_HEIGHT, max = MAX_DIMENSION)]
    InvalidHeight(u16),

    #[error("cannot parse board size {0:?}, expected \"W x H\"")]
    UnparsableSize(String),

    #[error("unknown randomizer {0:?}, expected \"uniform\" or \"bag7\"")]
    UnknownRandomizer(String),
}
