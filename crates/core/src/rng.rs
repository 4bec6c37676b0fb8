//! RNG module - seeded piece generation with a one-piece lookahead
//!
//! The default randomizer draws each piece independently and uniformly from
//! the seven kinds, so repeats are allowed. The "7-bag" randomizer (one of
//! each kind per shuffled bag) is available as an option.
//!
//! Randomness comes from a small LCG so a seed always replays the same game.

use serde::{Deserialize, Serialize};

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Scales the full 32-bit output instead of taking a modulus, since the
    /// low bits of an LCG cycle with short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current internal state
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// How the next piece kind is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Randomizer {
    /// Independent uniform draw per spawn
    #[default]
    Uniform,
    /// Shuffled bags holding one of each kind
    #[serde(rename = "bag7")]
    SevenBag,
}

impl Randomizer {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "uniform" => Some(Randomizer::Uniform),
            "bag7" | "7bag" | "bag" => Some(Randomizer::SevenBag),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Randomizer::Uniform => "uniform",
            Randomizer::SevenBag => "bag7",
        }
    }
}

/// Produces spawn kinds and keeps exactly one kind queued as a preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceGenerator {
    randomizer: Randomizer,
    rng: SimpleRng,
    /// Current bag (7-bag only)
    bag: [PieceKind; 7],
    /// Index into current bag; 7 means exhausted
    bag_index: usize,
    lookahead: Option<PieceKind>,
}

impl PieceGenerator {
    pub fn new(seed: u32, randomizer: Randomizer) -> Self {
        Self {
            randomizer,
            rng: SimpleRng::new(seed),
            bag: PieceKind::ALL,
            bag_index: PieceKind::ALL.len(),
            lookahead: None,
        }
    }

    pub fn randomizer(&self) -> Randomizer {
        self.randomizer
    }

    /// Forget the queued preview so the next game draws both pieces fresh.
    ///
    /// The RNG keeps its state, so consecutive games differ.
    pub fn reset(&mut self) {
        self.lookahead = None;
        self.bag_index = self.bag.len();
    }

    /// The queued preview, if a game has drawn one
    pub fn peek(&self) -> Option<PieceKind> {
        self.lookahead
    }

    /// Return `(kind to spawn now, new lookahead)`.
    ///
    /// The spawned kind is the previous lookahead; on the first call after
    /// [`reset`](Self::reset) it is drawn fresh as well.
    pub fn next(&mut self) -> (PieceKind, PieceKind) {
        let spawned = match self.lookahead.take() {
            Some(kind) => kind,
            None => self.draw(),
        };
        let lookahead = self.draw();
        self.lookahead = Some(lookahead);
        (spawned, lookahead)
    }

    fn draw(&mut self) -> PieceKind {
        match self.randomizer {
            Randomizer::Uniform => {
                let idx = self.rng.next_range(PieceKind::ALL.len() as u32) as usize;
                PieceKind::ALL[idx]
            }
            Randomizer::SevenBag => {
                if self.bag_index >= self.bag.len() {
                    self.bag = PieceKind::ALL;
                    self.rng.shuffle(&mut self.bag);
                    self.bag_index = 0;
                }
                let kind = self.bag[self.bag_index];
                self.bag_index += 1;
                kind
            }
        }
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new(1, Randomizer::Uniform)
    }
}
