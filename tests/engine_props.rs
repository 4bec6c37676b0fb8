//! Property tests for grid compaction and engine rollouts.
//!
//! Invariants covered:
//! - Clearing leaves no full row and removes exactly `cleared * width` cells.
//! - Score, lines, and level never decrease during a game, and level always
//!   matches the line count.
//! - The gravity interval never increases as the level rises.
//! - Every locked piece adds four cells minus whatever its clears removed.
//! - Once the game is over only a new game changes state.

use proptest::prelude::*;
use tetromino::core::scoring::{calculate_level, get_drop_interval_ms};
use tetromino::core::{BoardEngine, EngineConfig, GameEvent, Grid, Randomizer};
use tetromino::types::{BoardSize, GameAction, PieceKind, Position, DEFAULT_MIN_INTERVAL_MS};

const PLAY_ACTIONS: [GameAction; 7] = [
    GameAction::MoveLeft,
    GameAction::MoveRight,
    GameAction::SoftDrop,
    GameAction::HardDrop,
    GameAction::RotateCw,
    GameAction::RotateCcw,
    GameAction::TogglePause,
];

fn action_strategy() -> impl Strategy<Value = GameAction> {
    (0..PLAY_ACTIONS.len()).prop_map(|i| PLAY_ACTIONS[i])
}

fn grid_strategy() -> impl Strategy<Value = (BoardSize, Vec<bool>)> {
    (4u16..12, 4u16..16).prop_flat_map(|(width, height)| {
        let size = BoardSize::new(width, height);
        // Bias toward filled cells so full rows actually occur
        let cells = prop::collection::vec(prop::bool::weighted(0.85), size.area());
        (Just(size), cells)
    })
}

proptest! {
    #[test]
    fn clearing_removes_exactly_full_rows((size, filled) in grid_strategy()) {
        let mut grid = Grid::new(size).unwrap();
        for (i, &on) in filled.iter().enumerate() {
            if on {
                let pos = Position::new(
                    (i / size.width as usize) as i16,
                    (i % size.width as usize) as i16,
                );
                grid.set(pos, Some(PieceKind::ALL[i % 7]));
            }
        }
        let before = grid.occupied_count();
        let full_before = (0..size.height as usize).filter(|&r| grid.is_row_full(r)).count();

        let cleared = grid.clear_full_rows();

        prop_assert_eq!(cleared.len(), full_before);
        prop_assert!(cleared.windows(2).all(|w| w[0] < w[1]));
        prop_assert!((0..size.height as usize).all(|r| !grid.is_row_full(r)));
        prop_assert_eq!(grid.occupied_count(), before - cleared.len() * size.width as usize);
    }

    #[test]
    fn rollout_respects_core_invariants(
        seed in any::<u32>(),
        use_bag7 in any::<bool>(),
        actions in prop::collection::vec(action_strategy(), 1..300),
    ) {
        let randomizer = if use_bag7 { Randomizer::SevenBag } else { Randomizer::Uniform };
        let config = EngineConfig::default().with_seed(seed).with_randomizer(randomizer);
        let mut engine = BoardEngine::new(config).unwrap();
        engine.new_game();
        engine.drain_events().for_each(drop);

        for action in actions {
            let before = engine.score_snapshot();
            let cells_before = engine.grid().occupied_count();
            let locked_before = engine.pieces_locked();
            let was_over = engine.is_game_over();
            let frozen = engine.snapshot();

            let changed = engine.apply_action(action);
            let events: Vec<GameEvent> = engine.drain_events().collect();

            if was_over {
                prop_assert!(!changed);
                prop_assert!(events.is_empty());
                prop_assert_eq!(engine.snapshot(), frozen);
                continue;
            }
            if !changed {
                prop_assert!(events.is_empty());
            } else if action != GameAction::TogglePause {
                prop_assert!(matches!(events.last(), Some(GameEvent::Board(_))));
            }

            let after = engine.score_snapshot();
            prop_assert!(after.score >= before.score);
            prop_assert!(after.lines >= before.lines);
            prop_assert!(after.level >= before.level);
            prop_assert_eq!(after.level, calculate_level(after.lines));
            prop_assert!(after.interval_ms <= before.interval_ms);

            if engine.pieces_locked() > locked_before {
                let cleared = (after.lines - before.lines) as usize;
                prop_assert_eq!(
                    engine.grid().occupied_count(),
                    cells_before + 4 - cleared * engine.grid().width() as usize
                );
            } else {
                prop_assert_eq!(engine.grid().occupied_count(), cells_before);
            }

            if let Some(piece) = engine.active() {
                prop_assert!(piece.fits(engine.grid()));
            }
        }
    }

    #[test]
    fn interval_never_increases_with_level(level in 1u32..200) {
        let now = get_drop_interval_ms(level, DEFAULT_MIN_INTERVAL_MS);
        let next = get_drop_interval_ms(level + 1, DEFAULT_MIN_INTERVAL_MS);
        prop_assert!(next <= now);
        prop_assert!(next >= DEFAULT_MIN_INTERVAL_MS);
        if now > DEFAULT_MIN_INTERVAL_MS {
            prop_assert!(next < now);
        }
    }
}
