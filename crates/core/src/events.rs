//! Notifications emitted by the board engine.
//!
//! The engine queues events in the order state changes happen; a consumer
//! drains them after each call. Rejected moves queue nothing. Every committed
//! change ends with a single [`GameEvent::Board`] snapshot; while undrained,
//! older snapshots are replaced by the newest one.

use serde::{Deserialize, Serialize};

use crate::scoring::ScoreSnapshot;
use crate::snapshot::BoardSnapshot;
use crate::types::PieceKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum GameEvent {
    /// A game started on a board of this size
    NewGame { width: u16, height: u16 },
    /// Grid plus falling piece after the change
    Board(BoardSnapshot),
    /// Kind queued as the upcoming piece
    NextPiece(PieceKind),
    /// Rows removed by the last lock, pre-shift indices, top to bottom
    LinesCleared { rows: Vec<usize> },
    /// Stats after a change to score or lines
    Score(ScoreSnapshot),
    /// Level rose; the gravity driver should reschedule
    LevelUp { level: u32, interval_ms: u32 },
    /// Paused (`true`) or resumed (`false`)
    Paused(bool),
    /// Game ended (`true`) or a new one began (`false`)
    GameOver(bool),
}

impl GameEvent {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::NewGame { .. } => "newGame",
            GameEvent::Board(_) => "board",
            GameEvent::NextPiece(_) => "nextPiece",
            GameEvent::LinesCleared { .. } => "linesCleared",
            GameEvent::Score(_) => "score",
            GameEvent::LevelUp { .. } => "levelUp",
            GameEvent::Paused(_) => "paused",
            GameEvent::GameOver(_) => "gameOver",
        }
    }
}
