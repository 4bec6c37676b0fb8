//! Headless runner (default binary).
//!
//! Starts a game, lets the gravity driver pull pieces down in real time, and
//! feeds random player intents until the game ends or the time runs out.
//! Events go to stdout as JSON lines with `--json`; otherwise only the final
//! board is printed and progress is logged.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn, Level};
use tracing_subscriber::prelude::*;

use tetromino::core::{
    parse_randomizer, parse_size, BoardEngine, EngineConfig, GameEvent, SimpleRng,
};
use tetromino::driver::{GravityDriver, SharedEngine, DEFAULT_EVENT_CAPACITY};
use tetromino::types::GameAction;

/// Intents the random player picks from
const INTENTS: [GameAction; 6] = [
    GameAction::MoveLeft,
    GameAction::MoveRight,
    GameAction::RotateCw,
    GameAction::RotateCcw,
    GameAction::SoftDrop,
    GameAction::HardDrop,
];

#[derive(Debug, Parser)]
#[command(name = "tetromino", about = "Run a headless falling-block game")]
struct Cli {
    #[arg(short = 'v', long, action = clap::ArgAction::Count, help = "Increase verbosity (-v = INFO, -vv = DEBUG, -vvv = TRACE)")]
    verbose: u8,

    #[arg(long, help = "Board size as \"W x H\", e.g. \"15 x 30\"")]
    size: Option<String>,

    #[arg(long, help = "Seed for the piece generator")]
    seed: Option<u32>,

    #[arg(long, help = "Piece randomizer: uniform or bag7")]
    randomizer: Option<String>,

    #[arg(long, help = "Lower bound for the gravity interval in milliseconds")]
    min_interval_ms: Option<u32>,

    #[arg(long, default_value = "30", help = "Stop after this many seconds")]
    seconds: u64,

    #[arg(long, default_value = "200", help = "Milliseconds between player intents")]
    intent_ms: u64,

    #[arg(long, help = "Print every event as a JSON line")]
    json: bool,
}

impl Cli {
    /// Environment settings with command line overrides on top
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = EngineConfig::from_env();
        if let Some(size) = &self.size {
            config.size = parse_size(size)?;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(name) = &self.randomizer {
            config.randomizer = parse_randomizer(name)?;
        }
        if let Some(min_interval_ms) = self.min_interval_ms {
            config.min_interval_ms = min_interval_ms;
        }
        config.validate().context("invalid engine configuration")?;
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.engine_config()?;
    info!(
        size = %config.size,
        seed = config.seed,
        randomizer = config.randomizer.as_str(),
        "starting"
    );

    let player_seed = config.seed.wrapping_add(1);
    let engine = SharedEngine::new(BoardEngine::new(config)?, DEFAULT_EVENT_CAPACITY);
    let consumer = tokio::spawn(consume_events(engine.subscribe(), cli.json));

    engine.new_game();
    let gravity = GravityDriver::spawn(engine.clone());

    play(&engine, &gravity, player_seed, &cli).await;

    let ticks = gravity.stop().await.context("gravity driver panicked")?;
    let snapshot = engine.snapshot();
    let score = engine.score();
    info!(ticks, score = score.score, lines = score.lines, "finished");

    // Dropping the last handle closes the event channel.
    drop(engine);
    consumer.await.context("event consumer panicked")??;

    if cli.json {
        let summary = serde_json::json!({ "type": "final", "data": { "board": snapshot, "score": score } });
        println!("{summary}");
    } else {
        println!("{snapshot}");
        println!(
            "score {}  lines {}  level {}",
            score.score, score.lines, score.level
        );
    }
    Ok(())
}

/// Random player: one intent per tick until game over or the deadline
async fn play(engine: &SharedEngine, gravity: &GravityDriver, seed: u32, cli: &Cli) {
    let mut rng = SimpleRng::new(seed);
    let deadline = tokio::time::sleep(Duration::from_secs(cli.seconds));
    tokio::pin!(deadline);
    let mut intents = tokio::time::interval(Duration::from_millis(cli.intent_ms.max(1)));

    loop {
        tokio::select! {
            _ = &mut deadline => {
                info!("time is up");
                engine.with(BoardEngine::end_game);
                break;
            }
            _ = intents.tick() => {
                if gravity.is_finished() || engine.read(BoardEngine::is_game_over) {
                    break;
                }
                let action = INTENTS[rng.next_range(INTENTS.len() as u32) as usize];
                engine.apply(action);
            }
        }
    }
}

async fn consume_events(
    mut events: tokio::sync::broadcast::Receiver<GameEvent>,
    json: bool,
) -> Result<()> {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "event consumer lagged");
                continue;
            }
            Err(RecvError::Closed) => return Ok(()),
        };

        if json {
            println!("{}", serde_json::to_string(&event)?);
            continue;
        }

        match event {
            GameEvent::LinesCleared { rows } => info!(count = rows.len(), "lines cleared"),
            GameEvent::LevelUp { level, interval_ms } => info!(level, interval_ms, "level up"),
            GameEvent::GameOver(true) => info!("game over"),
            _ => {}
        }
    }
}
