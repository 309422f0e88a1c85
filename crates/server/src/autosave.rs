//! Periodic persistence and exploration decay.
//!
//! ```text
//! interval ──▶ Coordinator::tick() ──▶ persist (snapshot + write)
//!                                  └─▶ exploration.decay()
//! ```

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::coordinator::Coordinator;

/// Spawn the autosave loop on the current runtime.
///
/// Runs every `autosave_interval` from the coordinator's config, starting one
/// interval after the call. Abort the returned handle to stop it.
pub fn spawn_autosave(coordinator: Arc<Coordinator>) -> JoinHandle<()> {
    let period = coordinator.config().autosave_interval;
    tokio::spawn(async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            let epsilon = coordinator.tick().await;
            debug!(epsilon, states = coordinator.state_count(), "autosave tick");
        }
    })
}
