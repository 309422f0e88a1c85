//! Learning hyperparameters.

use std::time::Duration;

use crate::error::{LearningError, Result};

/// Hyperparameters for the decision/update loop.
#[derive(Debug, Clone, PartialEq)]
pub struct LearningConfig {
    /// Learning rate (alpha), in (0, 1].
    pub alpha: f64,
    /// Discount factor (gamma), in [0, 1].
    pub gamma: f64,
    /// Initial exploration rate (epsilon), in (0, 1].
    pub epsilon: f64,
    /// Multiplier applied to epsilon on every autosave tick, in (0, 1).
    pub epsilon_decay: f64,
    /// Lower bound for epsilon, in (0, epsilon].
    pub epsilon_floor: f64,
    /// Time between autosave ticks.
    pub autosave_interval: Duration,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            alpha: 0.12,
            gamma: 0.96,
            epsilon: 0.25,
            epsilon_decay: 0.995,
            epsilon_floor: 0.02,
            autosave_interval: Duration::from_secs(30),
        }
    }
}

impl LearningConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the learning rate.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the discount factor.
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set the initial exploration rate.
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the per-tick decay and the floor.
    pub fn epsilon_decay(mut self, decay: f64, floor: f64) -> Self {
        self.epsilon_decay = decay;
        self.epsilon_floor = floor;
        self
    }

    /// Set the autosave period.
    pub fn autosave_interval(mut self, interval: Duration) -> Self {
        self.autosave_interval = interval;
        self
    }

    /// Reject parameters outside their documented ranges.
    pub fn validate(&self) -> Result<()> {
        let in_range = |v: f64, lo_open: bool, lo: f64, hi: f64, hi_open: bool| {
            let above = if lo_open { v > lo } else { v >= lo };
            let below = if hi_open { v < hi } else { v <= hi };
            v.is_finite() && above && below
        };

        if !in_range(self.alpha, true, 0.0, 1.0, false) {
            return Err(invalid(format!("alpha must be in (0, 1], got {}", self.alpha)));
        }
        if !in_range(self.gamma, false, 0.0, 1.0, false) {
            return Err(invalid(format!("gamma must be in [0, 1], got {}", self.gamma)));
        }
        if !in_range(self.epsilon, true, 0.0, 1.0, false) {
            return Err(invalid(format!(
                "epsilon must be in (0, 1], got {}",
                self.epsilon
            )));
        }
        if !in_range(self.epsilon_decay, true, 0.0, 1.0, true) {
            return Err(invalid(format!(
                "epsilon decay must be in (0, 1), got {}",
                self.epsilon_decay
            )));
        }
        if !in_range(self.epsilon_floor, true, 0.0, self.epsilon, false) {
            return Err(invalid(format!(
                "epsilon floor must be in (0, {}], got {}",
                self.epsilon, self.epsilon_floor
            )));
        }
        if self.autosave_interval.is_zero() {
            return Err(invalid("autosave interval must be non-zero".to_string()));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> LearningError {
    LearningError::InvalidConfig(msg)
}
