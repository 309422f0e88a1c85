//! Per-connection pending decisions.
//!
//! A tracker belongs to exactly one connection and is dropped with it, which
//! discards every decision that never got a reward.
//!
//! At most one decision per bot is in flight: recording a new one for a bot
//! that still has an unrewarded decision replaces it, and the replaced
//! decision is never learned from.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use types::{ActionIndex, BotId, StateKey};

/// A decision waiting for its reward.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDecision {
    pub state: StateKey,
    pub action: ActionIndex,
    pub issued_at: Instant,
}

impl PendingDecision {
    /// Time since the decision was issued.
    pub fn age(&self) -> Duration {
        self.issued_at.elapsed()
    }
}

/// Pending decisions for one connection, keyed by bot.
#[derive(Debug, Default)]
pub struct SessionTracker {
    pending: HashMap<BotId, PendingDecision>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the decision just issued for `bot`, replacing any older one.
    ///
    /// Returns the replaced decision, if there was one.
    pub fn record_decision(
        &mut self,
        bot: BotId,
        state: StateKey,
        action: ActionIndex,
    ) -> Option<PendingDecision> {
        self.pending.insert(
            bot,
            PendingDecision {
                state,
                action,
                issued_at: Instant::now(),
            },
        )
    }

    /// Take the pending decision for `bot`.
    ///
    /// `None` is a normal outcome (duplicate or out-of-order reward) and
    /// callers ignore it.
    pub fn consume_decision(&mut self, bot: &BotId) -> Option<PendingDecision> {
        self.pending.remove(bot)
    }

    /// Whether `bot` has a decision in flight.
    pub fn is_pending(&self, bot: &BotId) -> bool {
        self.pending.contains_key(bot)
    }

    /// Number of decisions in flight.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
