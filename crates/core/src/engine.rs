//! Board engine - the game state machine
//!
//! This module ties together the grid, the active piece, the piece generator,
//! and the score tracker. Every operation runs synchronously to completion and
//! queues [`GameEvent`]s describing what changed.
//!
//! The engine owns no clock: an external driver calls [`BoardEngine::soft_drop`]
//! every [`BoardEngine::gravity_interval`]. Calls must be serialized by the
//! host; the engine does no locking of its own.

use std::time::Duration;

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::events::GameEvent;
use crate::grid::Grid;
use crate::pieces::ActivePiece;
use crate::rng::PieceGenerator;
use crate::scoring::{ScoreSnapshot, ScoreTracker};
use crate::snapshot::BoardSnapshot;
use crate::types::{BoardSize, GameAction, GameStatus, PieceKind, RotationDirection};

/// Complete engine state for one board.
///
/// Every state change queues events that stay queued until the host calls
/// [`drain_events`](Self::drain_events). Only the newest [`GameEvent::Board`]
/// snapshot is kept while undrained, so the queue grows with discrete events
/// (spawns, clears, pauses) rather than with one full grid per call.
#[derive(Debug, Clone)]
pub struct BoardEngine {
    config: EngineConfig,
    grid: Grid,
    active: Option<ActivePiece>,
    generator: PieceGenerator,
    next: Option<PieceKind>,
    tracker: ScoreTracker,
    status: GameStatus,
    /// Pieces locked in the current game
    pieces_locked: u32,
    events: Vec<GameEvent>,
}

impl BoardEngine {
    /// Create an idle engine.
    ///
    /// The engine starts in `GameOver` with no active piece, so nothing moves
    /// until [`new_game`](Self::new_game) is called.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::new(config.size)?;
        Ok(Self {
            generator: PieceGenerator::new(config.seed, config.randomizer),
            tracker: ScoreTracker::new(config.min_interval_ms),
            grid,
            config,
            active: None,
            next: None,
            status: GameStatus::GameOver,
            pieces_locked: 0,
            events: Vec::new(),
        })
    }

    /// Create an engine and start a game on a pre-filled grid.
    ///
    /// The grid's size replaces the configured size.
    pub fn with_grid(config: EngineConfig, grid: Grid) -> Result<Self, ConfigError> {
        let mut engine = Self::new(config.with_size(grid.size()))?;
        engine.grid = grid;
        engine.start();
        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    pub fn next_piece(&self) -> Option<PieceKind> {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.tracker.score()
    }

    pub fn lines(&self) -> u32 {
        self.tracker.lines()
    }

    pub fn level(&self) -> u32 {
        self.tracker.level()
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    /// Current gravity interval in milliseconds
    pub fn gravity_interval_ms(&self) -> u32 {
        self.tracker.interval_ms()
    }

    /// How long the driver should wait between gravity ticks
    pub fn gravity_interval(&self) -> Duration {
        Duration::from_millis(self.gravity_interval_ms() as u64)
    }

    pub fn score_snapshot(&self) -> ScoreSnapshot {
        self.tracker.snapshot()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::capture(&self.grid, self.active, self.status)
    }

    /// Events queued since the last drain, oldest first
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all queued events, oldest first
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Reset the board and score and spawn the first piece. Always succeeds.
    pub fn new_game(&mut self) {
        self.grid.reset();
        self.start();
    }

    /// Start a new game on a freshly built grid of `size`
    pub fn new_game_with_size(&mut self, size: BoardSize) -> Result<(), ConfigError> {
        self.grid.reset_with_size(size)?;
        self.config.size = size;
        self.start();
        Ok(())
    }

    fn start(&mut self) {
        self.tracker.reset();
        self.generator.reset();
        self.active = None;
        self.next = None;
        self.pieces_locked = 0;
        self.status = GameStatus::Active;

        info!(
            width = self.grid.width(),
            height = self.grid.height(),
            randomizer = self.generator.randomizer().as_str(),
            "new game"
        );
        self.events.push(GameEvent::NewGame {
            width: self.grid.width(),
            height: self.grid.height(),
        });
        self.events.push(GameEvent::GameOver(false));
        self.events.push(GameEvent::Score(self.tracker.snapshot()));

        self.spawn_piece();
        self.emit_board();
    }

    pub fn move_left(&mut self) -> bool {
        self.try_move(0, -1)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_move(0, 1)
    }

    /// Rotate clockwise, rejected outright if the rotated piece collides
    pub fn rotate(&mut self) -> bool {
        self.try_rotate(RotationDirection::Clockwise)
    }

    pub fn rotate_ccw(&mut self) -> bool {
        self.try_rotate(RotationDirection::CounterClockwise)
    }

    /// Move down one row, or lock the piece if it cannot move.
    ///
    /// Returns true whenever the state changed, i.e. on every call while the
    /// game is active.
    pub fn soft_drop(&mut self) -> bool {
        let Some(active) = self.playable_piece() else {
            return false;
        };

        let candidate = active.translated(1, 0);
        if candidate.fits(&self.grid) {
            self.active = Some(candidate);
        } else {
            self.lock_piece();
        }
        self.emit_board();
        true
    }

    /// Gravity tick from the external driver; same as [`soft_drop`](Self::soft_drop)
    pub fn tick(&mut self) -> bool {
        self.soft_drop()
    }

    /// Drop to the lowest free position and lock, as one step
    pub fn hard_drop(&mut self) -> bool {
        let Some(mut piece) = self.playable_piece() else {
            return false;
        };

        // Bounded by the grid height: the floor always obstructs.
        loop {
            let candidate = piece.translated(1, 0);
            if !candidate.fits(&self.grid) {
                break;
            }
            piece = candidate;
        }

        self.active = Some(piece);
        self.lock_piece();
        self.emit_board();
        true
    }

    /// Active -> Paused
    pub fn pause(&mut self) -> bool {
        if self.status != GameStatus::Active {
            return false;
        }
        self.status = GameStatus::Paused;
        debug!("paused");
        self.events.push(GameEvent::Paused(true));
        true
    }

    /// Paused -> Active
    pub fn resume(&mut self) -> bool {
        if self.status != GameStatus::Paused {
            return false;
        }
        self.status = GameStatus::Active;
        debug!("resumed");
        self.events.push(GameEvent::Paused(false));
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.status {
            GameStatus::Active => self.pause(),
            GameStatus::Paused => self.resume(),
            GameStatus::GameOver => false,
        }
    }

    /// Force the current game to end
    pub fn end_game(&mut self) -> bool {
        if self.status == GameStatus::GameOver {
            return false;
        }
        self.game_over();
        self.emit_board();
        true
    }

    /// Apply an intent; returns whether state changed
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::RotateCw => self.rotate(),
            GameAction::RotateCcw => self.rotate_ccw(),
            GameAction::TogglePause => self.toggle_pause(),
            GameAction::NewGame => {
                self.new_game();
                true
            }
            GameAction::EndGame => self.end_game(),
        }
    }

    /// The active piece, if moves are currently honored
    fn playable_piece(&self) -> Option<ActivePiece> {
        if !self.status.is_playable() {
            return None;
        }
        self.active
    }

    /// Try to move the active piece
    pub(crate) fn try_move(&mut self, delta_row: i16, delta_col: i16) -> bool {
        let Some(active) = self.playable_piece() else {
            return false;
        };
        self.try_commit(active.translated(delta_row, delta_col))
    }

    /// Try to rotate the active piece, no wall kicks
    pub(crate) fn try_rotate(&mut self, direction: RotationDirection) -> bool {
        let Some(active) = self.playable_piece() else {
            return false;
        };
        self.try_commit(active.rotated(direction))
    }

    fn try_commit(&mut self, candidate: ActivePiece) -> bool {
        // An O piece rotates onto itself.
        if self.active == Some(candidate) || !candidate.fits(&self.grid) {
            return false;
        }
        self.active = Some(candidate);
        self.emit_board();
        true
    }

    /// Write the active piece into the grid, clear rows, score, and spawn
    fn lock_piece(&mut self) {
        let Some(active) = self.active else {
            return;
        };

        // Leaves the engine untouched if it panics.
        self.grid.place(&active.occupied_cells(), active.kind);
        self.active = None;
        self.pieces_locked += 1;

        let cleared_rows = self.grid.clear_full_rows();
        debug!(
            kind = active.kind.as_str(),
            row = active.row,
            col = active.col,
            lines = cleared_rows.len(),
            "locked piece"
        );

        if !cleared_rows.is_empty() {
            let result = self.tracker.record_clear(cleared_rows.len());
            self.events.push(GameEvent::LinesCleared { rows: cleared_rows });
            self.events.push(GameEvent::Score(self.tracker.snapshot()));

            if result.leveled_up() {
                let interval_ms = self.tracker.interval_ms();
                debug!(level = result.level_after, interval_ms, "level up");
                self.events.push(GameEvent::LevelUp {
                    level: result.level_after,
                    interval_ms,
                });
            }
        }

        self.spawn_piece();
    }

    /// Spawn the queued piece; a collision at spawn ends the game
    fn spawn_piece(&mut self) -> bool {
        let (kind, next) = self.generator.next();
        self.next = Some(next);
        self.events.push(GameEvent::NextPiece(next));

        let piece = ActivePiece::spawn(kind, self.grid.width());
        if !piece.fits(&self.grid) {
            self.game_over();
            return false;
        }

        self.active = Some(piece);
        true
    }

    fn game_over(&mut self) {
        self.active = None;
        self.status = GameStatus::GameOver;
        info!(
            score = self.tracker.score(),
            lines = self.tracker.lines(),
            level = self.tracker.level(),
            "game over"
        );
        self.events.push(GameEvent::GameOver(true));
    }

    fn emit_board(&mut self) {
        let snapshot = self.snapshot();
        self.events.retain(|event| !matches!(event, GameEvent::Board(_)));
        self.events.push(GameEvent::Board(snapshot));
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    #[cfg(test)]
    pub(crate) fn set_active(&mut self, piece: Option<ActivePiece>) {
        self.active = piece;
    }
}

impl Default for BoardEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            generator: PieceGenerator::new(config.seed, config.randomizer),
            tracker: ScoreTracker::new(config.min_interval_ms),
            grid: Grid::default(),
            config,
            active: None,
            next: None,
            status: GameStatus::GameOver,
            pieces_locked: 0,
            events: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    fn started(seed: u32) -> BoardEngine {
        let mut engine = BoardEngine::new(EngineConfig::default().with_seed(seed)).unwrap();
        engine.new_game();
        engine.drain_events().for_each(drop);
        engine
    }

    #[test]
    fn test_new_engine_is_idle() {
        let mut engine = BoardEngine::new(EngineConfig::default()).unwrap();
        assert_eq!(engine.status(), GameStatus::GameOver);
        assert!(engine.active().is_none());
        assert!(!engine.soft_drop());
        assert!(!engine.move_left());
        assert!(engine.pending_events().is_empty());
    }

    #[test]
    fn test_new_rejects_bad_size() {
        let config = EngineConfig::default().with_size(BoardSize::new(0, 20));
        assert_eq!(
            BoardEngine::new(config).unwrap_err(),
            ConfigError::InvalidWidth(0)
        );
    }

    #[test]
    fn test_new_game_spawns_and_reports() {
        let mut engine = BoardEngine::new(EngineConfig::default().with_seed(12345)).unwrap();
        engine.new_game();

        assert_eq!(engine.status(), GameStatus::Active);
        let active = engine.active().unwrap();
        assert_eq!(active.rotation, 0);
        assert_eq!(active.anchor(), Position::new(0, 3));

        let names: Vec<_> = engine.drain_events().map(|e| e.name()).collect();
        assert_eq!(
            names,
            ["newGame", "gameOver", "score", "nextPiece", "board"]
        );
    }

    #[test]
    fn test_try_move() {
        let mut engine = started(12345);
        let initial_col = engine.active().unwrap().col;

        assert!(engine.try_move(0, 1));
        assert_eq!(engine.active().unwrap().col, initial_col + 1);

        assert!(engine.try_move(0, -1));
        assert_eq!(engine.active().unwrap().col, initial_col);

        // Can't move up past the top wall
        assert!(!engine.try_move(-1, 0));
    }

    #[test]
    fn test_rotating_o_is_not_a_change() {
        let mut engine = started(12345);
        let square = ActivePiece::spawn(PieceKind::O, 10);
        engine.set_active(Some(square));

        assert!(!engine.rotate());
        assert!(!engine.rotate_ccw());
        assert_eq!(engine.active(), Some(square));
        assert!(engine.pending_events().is_empty());
    }

    #[test]
    fn test_undrained_queue_keeps_latest_board_only() {
        let mut engine = started(12345);
        for _ in 0..50 {
            engine.move_left();
            engine.move_right();
        }
        assert_eq!(engine.pending_events().len(), 1);
        assert_eq!(
            engine.pending_events()[0],
            GameEvent::Board(engine.snapshot())
        );

        engine.hard_drop();
        let boards = engine
            .pending_events()
            .iter()
            .filter(|event| matches!(event, GameEvent::Board(_)))
            .count();
        assert_eq!(boards, 1);
        assert!(matches!(engine.pending_events().last(), Some(GameEvent::Board(_))));
    }

    #[test]
    fn test_failed_lock_leaves_piece_in_place() {
        let mut engine = started(12345);
        let piece = engine.active().unwrap();
        // Corrupt the grid under the piece so the lock precondition fails
        let cell = piece.occupied_cells()[0];
        engine.grid_mut().set(cell, Some(PieceKind::Z));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| engine.lock_piece()));
        assert!(result.is_err());
        assert_eq!(engine.active(), Some(piece));
        assert_eq!(engine.pieces_locked(), 0);
        assert_eq!(engine.status(), GameStatus::Active);
    }

    #[test]
    fn test_blocked_move_emits_nothing() {
        let mut engine = started(12345);
        while engine.move_left() {}
        engine.drain_events().for_each(drop);

        assert!(!engine.move_left());
        assert!(engine.pending_events().is_empty());
    }

    #[test]
    fn test_rotation_rejected_without_kick() {
        let mut engine = started(1);
        // Vertical I against the left wall cannot rotate back to horizontal.
        engine.set_active(Some(ActivePiece {
            kind: PieceKind::I,
            rotation: 3,
            row: 5,
            col: -1,
        }));
        assert!(engine.active().unwrap().fits(engine.grid()));
        assert!(!engine.rotate());
        assert_eq!(engine.active().unwrap().rotation, 3);
    }

    #[test]
    fn test_soft_drop_locks_when_blocked() {
        let mut engine = started(12345);
        engine.set_active(Some(ActivePiece::spawn(PieceKind::O, 10).translated(18, 0)));

        assert!(engine.soft_drop());
        assert_eq!(engine.pieces_locked(), 1);
        assert_eq!(engine.grid().occupied_count(), 4);
        assert_eq!(
            engine.grid().get(Position::new(19, 4)),
            Some(Some(PieceKind::O))
        );
        assert_eq!(engine.active().unwrap().row, 0);
    }

    #[test]
    fn test_lock_clears_line_and_scores() {
        let mut engine = started(12345);
        for col in 0..6 {
            engine.grid_mut().set(Position::new(19, col), Some(PieceKind::L));
        }
        // Horizontal I covering columns 6..=9 of the bottom row
        engine.set_active(Some(ActivePiece {
            kind: PieceKind::I,
            rotation: 0,
            row: 0,
            col: 6,
        }));

        assert!(engine.hard_drop());
        assert_eq!(engine.lines(), 1);
        assert_eq!(engine.score(), 100);
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.grid().occupied_count(), 0);

        let events: Vec<_> = engine.drain_events().collect();
        assert!(events.contains(&GameEvent::LinesCleared { rows: vec![19] }));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::LevelUp { .. })));
        assert!(matches!(events.last(), Some(GameEvent::Board(_))));
    }

    #[test]
    fn test_tetris_scores_bonus_and_levels_up() {
        let mut engine = started(12345);
        for row in 16..20 {
            for col in 0..10 {
                if col != 9 {
                    engine.grid_mut().set(Position::new(row, col), Some(PieceKind::T));
                }
            }
        }
        // Vertical I in the right well: rotation 1 puts cells in column col + 2
        engine.set_active(Some(ActivePiece {
            kind: PieceKind::I,
            rotation: 1,
            row: 0,
            col: 7,
        }));

        assert!(engine.hard_drop());
        assert_eq!(engine.lines(), 4);
        assert_eq!(engine.score(), 800);
        assert_eq!(engine.grid().occupied_count(), 0);

        // One more line crosses into level 2
        for col in 0..6 {
            engine.grid_mut().set(Position::new(19, col), Some(PieceKind::S));
        }
        engine.set_active(Some(ActivePiece {
            kind: PieceKind::I,
            rotation: 0,
            row: 0,
            col: 6,
        }));
        engine.drain_events().for_each(drop);
        assert!(engine.hard_drop());
        assert_eq!(engine.level(), 2);
        assert_eq!(engine.score(), 900);
        assert!(engine
            .drain_events()
            .any(|e| e == GameEvent::LevelUp { level: 2, interval_ms: 925 }));
        assert_eq!(engine.gravity_interval(), Duration::from_millis(925));
    }

    #[test]
    fn test_spawn_collision_ends_game() {
        let mut engine = started(12345);
        for col in 0..10 {
            if col != 0 {
                engine.grid_mut().set(Position::new(1, col), Some(PieceKind::Z));
            }
        }
        engine.set_active(Some(ActivePiece::spawn(PieceKind::O, 10).translated(10, 0)));

        assert!(engine.hard_drop());
        assert_eq!(engine.status(), GameStatus::GameOver);
        assert!(engine.active().is_none());
        assert!(engine.drain_events().any(|e| e == GameEvent::GameOver(true)));

        // Everything except a new game is ignored
        let grid_before = engine.grid().clone();
        for action in [
            GameAction::MoveLeft,
            GameAction::MoveRight,
            GameAction::SoftDrop,
            GameAction::HardDrop,
            GameAction::RotateCw,
            GameAction::TogglePause,
            GameAction::EndGame,
        ] {
            assert!(!engine.apply_action(action), "{action:?} changed state");
        }
        assert_eq!(engine.grid(), &grid_before);
        assert!(engine.pending_events().is_empty());

        assert!(engine.apply_action(GameAction::NewGame));
        assert_eq!(engine.status(), GameStatus::Active);
        assert_eq!(engine.grid().occupied_count(), 0);
    }

    #[test]
    fn test_pause_blocks_movement() {
        let mut engine = started(12345);
        assert!(engine.pause());
        assert!(!engine.pause());
        let before = engine.active();

        assert!(!engine.move_left());
        assert!(!engine.soft_drop());
        assert!(!engine.hard_drop());
        assert!(!engine.rotate());
        assert_eq!(engine.active(), before);

        assert!(engine.resume());
        assert!(!engine.resume());
        let names: Vec<_> = engine.drain_events().collect();
        assert_eq!(names, [GameEvent::Paused(true), GameEvent::Paused(false)]);
        assert!(engine.move_left());
    }

    #[test]
    fn test_end_game_from_pause() {
        let mut engine = started(12345);
        engine.pause();
        assert!(engine.end_game());
        assert!(engine.is_game_over());
        assert!(engine.active().is_none());
        assert!(!engine.resume());
    }

    #[test]
    fn test_new_game_with_size() {
        let mut engine = started(12345);
        engine.hard_drop();
        engine
            .new_game_with_size(BoardSize::new(15, 30))
            .unwrap();
        assert_eq!(engine.grid().size(), BoardSize::new(15, 30));
        assert_eq!(engine.config().size, BoardSize::new(15, 30));
        assert_eq!(engine.active().unwrap().col, 5);
        assert_eq!(engine.pieces_locked(), 0);

        assert_eq!(
            engine.new_game_with_size(BoardSize::new(15, 2)),
            Err(ConfigError::InvalidHeight(2))
        );
        assert_eq!(engine.grid().size(), BoardSize::new(15, 30));
    }

    #[test]
    fn test_next_piece_matches_following_spawn() {
        let mut engine = started(777);
        for _ in 0..20 {
            if engine.is_game_over() {
                break;
            }
            let next = engine.next_piece().unwrap();
            engine.hard_drop();
            if let Some(active) = engine.active() {
                assert_eq!(active.kind, next);
            }
        }
    }
}
