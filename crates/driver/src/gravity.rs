//! Gravity timer task.
//!
//! The driver re-reads the engine's interval before every sleep, so a level
//! change takes effect from the next tick. While paused the ticks still fire
//! but the engine ignores them.

use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info};

use crate::shared::SharedEngine;
use crate::types::GameStatus;

/// Handle to a running gravity task
#[derive(Debug)]
pub struct GravityDriver {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<u64>,
}

impl GravityDriver {
    /// Spawn the gravity task on the current tokio runtime.
    ///
    /// The task ends by itself once the game is over, so start a game before
    /// spawning.
    pub fn spawn(engine: SharedEngine) -> Self {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run(engine, shutdown_rx));
        Self { shutdown, handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Signal the task to stop and wait for it; returns the ticks applied.
    ///
    /// Fails if the task panicked or was cancelled.
    pub async fn stop(self) -> Result<u64, JoinError> {
        let _ = self.shutdown.send(true);
        self.handle.await
    }

    /// Wait for the task to end on its own (game over)
    pub async fn join(self) -> Result<u64, JoinError> {
        self.handle.await
    }
}

async fn run(engine: SharedEngine, mut shutdown: watch::Receiver<bool>) -> u64 {
    info!("gravity driver started");
    let mut ticks = 0u64;
    let mut current = engine.gravity_interval();

    loop {
        if engine.status() == GameStatus::GameOver {
            break;
        }

        let interval = engine.gravity_interval();
        if interval != current {
            debug!(interval_ms = interval.as_millis() as u64, "gravity interval changed");
            current = interval;
        }
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            changed = shutdown.changed() => {
                // A dropped sender also means stop.
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
                continue;
            }
        }

        if engine.soft_drop() {
            ticks += 1;
        } else {
            debug!(status = engine.status().as_str(), "gravity tick ignored");
        }
    }

    info!(ticks, "gravity driver stopped");
    ticks
}
