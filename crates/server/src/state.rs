//! Shared server state.
//!
//! Cloned into every handler via Axum's `State` extractor. The coordinator
//! owns the learning state; this struct only holds references to it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::coordinator::Coordinator;

/// Shared state for all route handlers.
#[derive(Clone)]
pub struct ServerState {
    /// Decision/update engine shared by every connection.
    pub coordinator: Arc<Coordinator>,

    /// Server start time.
    pub start_time: Instant,

    /// Shared metrics (same instance the coordinator updates).
    pub metrics: Arc<ServerMetrics>,
}

impl ServerState {
    /// Create server state around a coordinator.
    pub fn new(coordinator: Arc<Coordinator>) -> Self {
        let metrics = coordinator.metrics();
        Self {
            coordinator,
            start_time: Instant::now(),
            metrics,
        }
    }

    /// Get uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Service counters.
#[derive(Debug, Default)]
pub struct ServerMetrics {
    /// Active WebSocket connections.
    pub ws_connections: AtomicU64,
    /// Actions handed out.
    pub decisions: AtomicU64,
    /// Table updates applied.
    pub updates: AtomicU64,
    /// Rewards that arrived with no pending decision.
    pub unmatched_rewards: AtomicU64,
    /// Frames dropped as malformed, unknown or invalid.
    pub dropped_messages: AtomicU64,
    /// Successful table saves.
    pub saves: AtomicU64,
    /// Failed table saves.
    pub save_failures: AtomicU64,
}

impl ServerMetrics {
    /// Create new metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment WebSocket connection count.
    pub fn ws_connect(&self) {
        self.ws_connections.fetch_add(1, Ordering::Relaxed);
    }

    /// Decrement WebSocket connection count.
    pub fn ws_disconnect(&self) {
        self.ws_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn record_decision(&self) {
        self.decisions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_update(&self) {
        self.updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unmatched_reward(&self) {
        self.unmatched_rewards.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.dropped_messages.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a save attempt by outcome.
    pub fn record_save(&self, ok: bool) {
        if ok {
            self.saves.fetch_add(1, Ordering::Relaxed);
        } else {
            self.save_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get WebSocket connection count.
    pub fn ws_count(&self) -> u64 {
        self.ws_connections.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of every counter.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ws_connections: self.ws_count(),
            decisions: self.decisions.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            unmatched_rewards: self.unmatched_rewards.load(Ordering::Relaxed),
            dropped_messages: self.dropped_messages.load(Ordering::Relaxed),
            saves: self.saves.load(Ordering::Relaxed),
            save_failures: self.save_failures.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of [`ServerMetrics`] for responses and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct MetricsSnapshot {
    pub ws_connections: u64,
    pub decisions: u64,
    pub updates: u64,
    pub unmatched_rewards: u64,
    pub dropped_messages: u64,
    pub saves: u64,
    pub save_failures: u64,
}
