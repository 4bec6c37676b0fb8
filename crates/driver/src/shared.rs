//! Engine handle shared between tasks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::trace;

use crate::core::{BoardEngine, BoardSnapshot, GameEvent, ScoreSnapshot};
use crate::types::{GameAction, GameStatus};

/// Events buffered per subscriber before the slowest one starts lagging
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Cloneable handle to one engine.
///
/// Every call locks the engine, runs to completion, and publishes the queued
/// events while still holding the lock, so subscribers see events in the
/// order the engine produced them.
#[derive(Debug, Clone)]
pub struct SharedEngine {
    engine: Arc<Mutex<BoardEngine>>,
    events: broadcast::Sender<GameEvent>,
}

impl SharedEngine {
    pub fn new(engine: BoardEngine, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            engine: Arc::new(Mutex::new(engine)),
            events,
        }
    }

    /// Receive every event published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    /// Run `f` against the engine and publish what it queued
    pub fn with<R>(&self, f: impl FnOnce(&mut BoardEngine) -> R) -> R {
        let mut engine = self.lock();
        let result = f(&mut *engine);
        for event in engine.drain_events() {
            trace!(event = event.name(), "publish");
            // No subscribers is fine; the event is dropped.
            let _ = self.events.send(event);
        }
        result
    }

    /// Read engine state without publishing
    pub fn read<R>(&self, f: impl FnOnce(&BoardEngine) -> R) -> R {
        f(&*self.lock())
    }

    pub fn apply(&self, action: GameAction) -> bool {
        self.with(|engine| engine.apply_action(action))
    }

    pub fn new_game(&self) {
        self.with(BoardEngine::new_game)
    }

    pub fn soft_drop(&self) -> bool {
        self.with(BoardEngine::soft_drop)
    }

    pub fn status(&self) -> GameStatus {
        self.read(BoardEngine::status)
    }

    pub fn gravity_interval(&self) -> Duration {
        self.read(BoardEngine::gravity_interval)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.read(BoardEngine::snapshot)
    }

    pub fn score(&self) -> ScoreSnapshot {
        self.read(BoardEngine::score_snapshot)
    }

    fn lock(&self) -> MutexGuard<'_, BoardEngine> {
        // A panicking engine call fails before mutating, so a poisoned lock is usable.
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
