//! Observation → state key bucketing.
//!
//! Five buckets in fixed order: health, ammo, distance, in-zone, has-item.
//! Total over every input: a missing or unusable field always lands in the
//! same default bucket.

use types::{Observation, StateKey};

/// Health values are clamped to this range before bucketing.
pub const MAX_HEALTH: f64 = 100.0;
/// Width of one health bucket; 100 lands in bucket 4.
pub const HEALTH_BUCKET_WIDTH: f64 = 25.0;
/// Distance assumed when the client did not report one.
pub const DISTANCE_SENTINEL: f64 = 999.0;
/// Width of one distance bucket.
pub const DISTANCE_BUCKET_WIDTH: f64 = 20.0;
/// Highest distance bucket; everything farther collapses into it.
pub const MAX_DISTANCE_BUCKET: u8 = 4;

/// Map an observation to its state key.
pub fn discretize(obs: &Observation) -> StateKey {
    StateKey::from_buckets(&[
        health_bucket(obs.health),
        ammo_bucket(obs.ammo),
        distance_bucket(obs.distance),
        u8::from(obs.in_zone),
        u8::from(obs.has_item),
    ])
}

fn health_bucket(health: Option<f64>) -> u8 {
    let value = health.unwrap_or(0.0).clamp(0.0, MAX_HEALTH).round();
    (value / HEALTH_BUCKET_WIDTH).floor() as u8
}

fn ammo_bucket(ammo: Option<f64>) -> u8 {
    u8::from(ammo.is_some_and(|a| a > 0.0))
}

fn distance_bucket(distance: Option<f64>) -> u8 {
    let value = distance.unwrap_or(DISTANCE_SENTINEL).max(0.0).round();
    let bucket = (value / DISTANCE_BUCKET_WIDTH).floor();
    bucket.min(f64::from(MAX_DISTANCE_BUCKET)) as u8
}
