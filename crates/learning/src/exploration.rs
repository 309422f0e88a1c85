//! Process-wide exploration rate.
//!
//! Read on every decision from many connections; written only by the
//! periodic decay. Stored as `f64` bits in an atomic so readers never block.

use std::sync::atomic::{AtomicU64, Ordering};

/// Exploration rate that decays geometrically toward a floor.
#[derive(Debug)]
pub struct ExplorationRate {
    bits: AtomicU64,
    decay: f64,
    floor: f64,
}

impl ExplorationRate {
    /// `initial` is clamped up to `floor`.
    pub fn new(initial: f64, decay: f64, floor: f64) -> Self {
        Self {
            bits: AtomicU64::new(initial.max(floor).to_bits()),
            decay,
            floor,
        }
    }

    /// Current rate.
    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Multiply by the decay factor, never going below the floor.
    /// Returns the new rate.
    pub fn decay(&self) -> f64 {
        let step = |bits: u64| (f64::from_bits(bits) * self.decay).max(self.floor);
        // The closure always returns Some, so both arms carry the previous bits.
        let previous = self
            .bits
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                Some(step(bits).to_bits())
            })
            .unwrap_or_else(|bits| bits);
        step(previous)
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    pub fn decay_factor(&self) -> f64 {
        self.decay
    }
}
