//! Engine configuration
//!
//! Defaults describe the classic game: a 10 x 20 board, uniform random pieces,
//! and a 100ms floor on the gravity interval. Values can be overridden from
//! environment variables with [`EngineConfig::from_env`].

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rng::Randomizer;
use crate::types::{BoardSize, DEFAULT_MIN_INTERVAL_MS, MAX_DIMENSION, MIN_HEIGHT, MIN_WIDTH};

/// Settings fixed for the lifetime of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub size: BoardSize,
    pub seed: u32,
    pub randomizer: Randomizer,
    /// Floor for the gravity interval so it never reaches zero
    pub min_interval_ms: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size: BoardSize::default(),
            seed: 1,
            randomizer: Randomizer::Uniform,
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
        }
    }
}

impl EngineConfig {
    /// Build from environment variables, falling back to defaults.
    ///
    /// - `TETROMINO_WIDTH` / `TETROMINO_HEIGHT`: board dimensions
    /// - `TETROMINO_SEED`: generator seed
    /// - `TETROMINO_RANDOMIZER`: `uniform` or `bag7`
    /// - `TETROMINO_MIN_INTERVAL_MS`: gravity interval floor
    ///
    /// Missing or unparsable values keep their default. The result is not
    /// validated; call [`EngineConfig::validate`] before use.
    pub fn from_env() -> Self {
        use std::env;

        fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
            env::var(key).ok().and_then(|s| s.trim().parse().ok())
        }

        let defaults = Self::default();
        let width = parsed("TETROMINO_WIDTH").unwrap_or(defaults.size.width);
        let height = parsed("TETROMINO_HEIGHT").unwrap_or(defaults.size.height);
        let seed = parsed("TETROMINO_SEED").unwrap_or(defaults.seed);
        let randomizer = env::var("TETROMINO_RANDOMIZER")
            .ok()
            .and_then(|s| Randomizer::from_str(&s))
            .unwrap_or(defaults.randomizer);
        let min_interval_ms =
            parsed("TETROMINO_MIN_INTERVAL_MS").unwrap_or(defaults.min_interval_ms);

        Self {
            size: BoardSize::new(width, height),
            seed,
            randomizer,
            min_interval_ms,
        }
    }

    /// Same configuration with a different board size
    pub fn with_size(mut self, size: BoardSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_randomizer(mut self, randomizer: Randomizer) -> Self {
        self.randomizer = randomizer;
        self
    }

    /// Check the board dimensions
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_size(self.size)
    }
}

/// Reject sizes that cannot hold every tetromino in every rotation
pub fn validate_size(size: BoardSize) -> Result<(), ConfigError> {
    if !(MIN_WIDTH..=MAX_DIMENSION).contains(&size.width) {
        return Err(ConfigError::InvalidWidth(size.width));
    }
    if !(MIN_HEIGHT..=MAX_DIMENSION).contains(&size.height) {
        return Err(ConfigError::InvalidHeight(size.height));
    }
    Ok(())
}

/// Parse a `"W x H"` string into a validated size
pub fn parse_size(s: &str) -> Result<BoardSize, ConfigError> {
    let size = BoardSize::parse(s).ok_or_else(|| ConfigError::UnparsableSize(s.to_string()))?;
    validate_size(size)?;
    Ok(size)
}

/// Parse a randomizer name such as `uniform` or `bag7`
pub fn parse_randomizer(s: &str) -> Result<Randomizer, ConfigError> {
    Randomizer::from_str(s).ok_or_else(|| ConfigError::UnknownRandomizer(s.to_string()))
}
