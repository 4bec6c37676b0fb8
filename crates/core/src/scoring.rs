//! Scoring module - score, level, and gravity interval
//!
//! Rules:
//! - Clearing 1-3 lines at once scores 100 per line; four lines score 800.
//! - Level starts at 1 and rises by one every 5 lines cleared in total.
//! - Gravity interval is 1000ms at level 1 and 75ms shorter per level,
//!   never below a configured floor.

use serde::{Deserialize, Serialize};

use crate::types::{
    BASE_INTERVAL_MS, FOUR_LINE_SCORE, INTERVAL_STEP_MS, LINES_PER_LEVEL, LINE_SCORE,
};

/// Points for clearing `lines` rows with a single lock
pub fn calculate_line_score(lines: usize) -> u32 {
    match lines {
        0 => 0,
        4 => FOUR_LINE_SCORE,
        n => LINE_SCORE * n as u32,
    }
}

/// Level for a total line count (starts at 1)
pub fn calculate_level(total_lines: u32) -> u32 {
    1 + total_lines / LINES_PER_LEVEL
}

/// Lines still needed to reach the next level
pub fn lines_until_next_level(total_lines: u32) -> u32 {
    LINES_PER_LEVEL - total_lines % LINES_PER_LEVEL
}

/// Get gravity interval for a level (in milliseconds), clamped at `min_ms`
pub fn get_drop_interval_ms(level: u32, min_ms: u32) -> u32 {
    let reduction = level.saturating_sub(1).saturating_mul(INTERVAL_STEP_MS);
    BASE_INTERVAL_MS.saturating_sub(reduction).max(min_ms.max(1))
}

/// Result of recording one lock's line clears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearResult {
    pub points: u32,
    pub level_before: u32,
    pub level_after: u32,
}

impl ClearResult {
    pub fn leveled_up(&self) -> bool {
        self.level_after > self.level_before
    }
}

/// Point-in-time stats for consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub lines_until_next_level: u32,
    pub interval_ms: u32,
}

/// Cumulative lines and score for one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreTracker {
    score: u32,
    lines: u32,
    min_interval_ms: u32,
}

impl ScoreTracker {
    pub fn new(min_interval_ms: u32) -> Self {
        Self {
            score: 0,
            lines: 0,
            min_interval_ms,
        }
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.lines = 0;
    }

    /// Add the rows cleared by one lock
    pub fn record_clear(&mut self, lines: usize) -> ClearResult {
        let level_before = self.level();
        let points = calculate_line_score(lines);
        self.lines = self.lines.saturating_add(lines as u32);
        self.score = self.score.saturating_add(points);
        ClearResult {
            points,
            level_before,
            level_after: self.level(),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        calculate_level(self.lines)
    }

    pub fn interval_ms(&self) -> u32 {
        get_drop_interval_ms(self.level(), self.min_interval_ms)
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            score: self.score,
            lines: self.lines,
            level: self.level(),
            lines_until_next_level: lines_until_next_level(self.lines),
            interval_ms: self.interval_ms(),
        }
    }
}

impl Default for ScoreTracker {
    fn default() -> Self {
        Self::new(crate::types::DEFAULT_MIN_INTERVAL_MS)
    }
}
