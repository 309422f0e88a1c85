//! Per-message orchestration over the shared value table.
//!
//! One [`Coordinator`] serves every connection. Each connection owns a
//! [`Session`] (its pending decisions and its random source) and feeds its
//! messages through [`Coordinator::handle_message`] one at a time, in
//! arrival order.
//!
//! # Locking
//!
//! The whole table sits behind a single mutex. Every critical section is one
//! or two fixed-length rows: "ensure row, scan max" for a decision and
//! "read, compute, write" for an update. Saves clone the table under the
//! lock and serialize the copy on a blocking worker, so disk I/O never holds
//! the lock.

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tracing::{debug, info, warn};

use learning::{
    ExplorationRate, LearningConfig, LearningError, SessionTracker, TableStore, ValueTable,
    discretize, select_action, update,
};
use types::{BotId, ClientMessage, Observation, ServerMessage, StateKey, ValueRow};

use crate::state::ServerMetrics;

// =============================================================================
// Session
// =============================================================================

/// Connection-scoped state. Created when a client connects and dropped when
/// it disconnects, taking every unrewarded decision with it.
#[derive(Debug)]
pub struct Session {
    tracker: SessionTracker,
    rng: StdRng,
}

impl Session {
    pub fn new() -> Self {
        Self {
            tracker: SessionTracker::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Session with a fixed random source.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            tracker: SessionTracker::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Coordinator
// =============================================================================

/// Shared decision/update engine.
pub struct Coordinator {
    table: Mutex<ValueTable>,
    exploration: ExplorationRate,
    config: LearningConfig,
    store: Arc<dyn TableStore>,
    metrics: Arc<ServerMetrics>,
    /// Held across snapshot + write so an older snapshot never lands after a
    /// newer one.
    save_lock: tokio::sync::Mutex<()>,
}

impl Coordinator {
    /// Build a coordinator and load the table from `store`.
    ///
    /// A failed load is logged and the service starts with an empty table.
    pub fn new(config: LearningConfig, store: Arc<dyn TableStore>) -> Self {
        let table = match store.load() {
            Ok(table) => {
                info!(store = %store.describe(), states = table.len(), "value table loaded");
                table
            }
            Err(e) => {
                warn!(store = %store.describe(), error = %e, "could not load value table, starting empty");
                ValueTable::new()
            }
        };

        Self {
            table: Mutex::new(table),
            exploration: ExplorationRate::new(
                config.epsilon,
                config.epsilon_decay,
                config.epsilon_floor,
            ),
            config,
            store,
            metrics: Arc::new(ServerMetrics::new()),
            save_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Route one decoded client message.
    ///
    /// Returns the reply to send back, if the message kind has one.
    pub async fn handle_message(
        &self,
        session: &mut Session,
        msg: ClientMessage,
    ) -> Option<ServerMessage> {
        match msg {
            ClientMessage::Observation { bot_id, obs } => Some(self.decide(session, bot_id, &obs)),
            ClientMessage::Reward {
                bot_id,
                reward,
                next_obs,
            } => {
                self.learn(session, &bot_id, reward, &next_obs);
                None
            }
            ClientMessage::Persist => {
                let ok = self.persist().await.is_ok();
                Some(ServerMessage::Persisted {
                    ok,
                    states: self.state_count(),
                })
            }
            ClientMessage::Heartbeat => Some(ServerMessage::HeartbeatEcho),
            ClientMessage::Unknown => {
                self.metrics.record_dropped();
                debug!("ignoring message of unknown type");
                None
            }
        }
    }

    /// Choose an action for `bot` and remember it until the reward arrives.
    ///
    /// A bot that already had a decision in flight loses it: only the latest
    /// decision per bot is ever rewarded.
    pub fn decide(&self, session: &mut Session, bot: BotId, obs: &Observation) -> ServerMessage {
        let state = discretize(obs);
        let epsilon = self.exploration.get();
        let action = {
            let mut table = self.table.lock();
            select_action(&mut table, epsilon, &state, &mut session.rng)
        };

        if let Some(replaced) = session
            .tracker
            .record_decision(bot.clone(), state.clone(), action)
        {
            debug!(
                bot = %bot,
                state = %replaced.state,
                action = %replaced.action,
                age_ms = replaced.age().as_millis() as u64,
                "unrewarded decision replaced"
            );
        }
        self.metrics.record_decision();
        debug!(bot = %bot, state = %state, action = %action, epsilon, "decision");

        ServerMessage::Action {
            bot_id: bot,
            action: action.name().to_string(),
        }
    }

    /// Apply a reward to the bot's pending decision.
    ///
    /// Returns the updated value, or `None` when the reward was ignored
    /// (non-finite reward, no decision pending for this bot, or an update that
    /// would overflow the entry). An overflowing update still consumes the
    /// pending decision.
    pub fn learn(
        &self,
        session: &mut Session,
        bot: &BotId,
        reward: f64,
        next_obs: &Observation,
    ) -> Option<f64> {
        if !reward.is_finite() {
            self.metrics.record_dropped();
            debug!(bot = %bot, reward, "dropping non-finite reward");
            return None;
        }

        let Some(pending) = session.tracker.consume_decision(bot) else {
            self.metrics.record_unmatched_reward();
            debug!(bot = %bot, "reward without pending decision");
            return None;
        };

        let next_state = discretize(next_obs);
        let updated = {
            let mut table = self.table.lock();
            update(
                &mut table,
                &pending.state,
                pending.action,
                reward,
                &next_state,
                self.config.alpha,
                self.config.gamma,
            )
        };
        let Some(value) = updated else {
            self.metrics.record_dropped();
            warn!(
                bot = %bot,
                state = %pending.state,
                action = %pending.action,
                reward,
                "update overflowed, entry left unchanged"
            );
            return None;
        };
        self.metrics.record_update();
        debug!(
            bot = %bot,
            state = %pending.state,
            action = %pending.action,
            reward,
            next_state = %next_state,
            value,
            "update"
        );
        Some(value)
    }

    /// Write the whole table to the store. Returns the number of states saved.
    ///
    /// Failures are logged and counted; the in-memory table is untouched
    /// either way.
    pub async fn persist(&self) -> learning::Result<usize> {
        let _guard = self.save_lock.lock().await;
        let snapshot = self.snapshot();
        let states = snapshot.len();
        let store = Arc::clone(&self.store);

        let result = tokio::task::spawn_blocking(move || store.save(&snapshot))
            .await
            .map_err(|e| LearningError::Io(std::io::Error::other(e.to_string())))
            .and_then(|r| r);

        self.metrics.record_save(result.is_ok());
        match result {
            Ok(()) => {
                info!(store = %self.store.describe(), states, "value table saved");
                Ok(states)
            }
            Err(e) => {
                warn!(store = %self.store.describe(), error = %e, "value table save failed");
                Err(e)
            }
        }
    }

    /// Periodic maintenance: save, then decay the exploration rate.
    ///
    /// Returns the exploration rate after decay.
    pub async fn tick(&self) -> f64 {
        // Failure already logged and counted by persist().
        let _ = self.persist().await;
        let epsilon = self.exploration.decay();
        debug!(epsilon, "exploration rate decayed");
        epsilon
    }

    /// Consistent copy of the table.
    pub fn snapshot(&self) -> ValueTable {
        self.table.lock().clone()
    }

    /// Number of distinct states known.
    pub fn state_count(&self) -> usize {
        self.table.lock().len()
    }

    /// Row for `key`, without creating it.
    pub fn row(&self, key: &StateKey) -> Option<ValueRow> {
        self.table.lock().get(key).copied()
    }

    /// Current exploration rate.
    pub fn exploration_rate(&self) -> f64 {
        self.exploration.get()
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    pub fn metrics(&self) -> Arc<ServerMetrics> {
        Arc::clone(&self.metrics)
    }
}
