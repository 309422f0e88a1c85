//! Core types for the Arena RL learning service.
//!
//! This crate provides the data shared by the learning core and the server:
//! bot identifiers, raw observations, discretized state keys, the fixed action
//! set, and the WebSocket wire protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod messages;
pub mod serde_utils;

pub use messages::{ClientMessage, ServerMessage};

// =============================================================================
// Action Set
// =============================================================================

/// Number of actions a bot can be told to take.
pub const ACTION_COUNT: usize = 6;

/// Action identifiers in index order. Fixed for the lifetime of the process;
/// persisted value rows are laid out in this order.
pub const ACTIONS: [&str; ACTION_COUNT] = [
    "attack",
    "retreat",
    "seek_ammo",
    "seek_zone",
    "use_item",
    "patrol",
];

/// One estimated value per action, in `ACTIONS` order.
pub type ValueRow = [f64; ACTION_COUNT];

/// Index into the fixed action set. Always `< ACTION_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ActionIndex(usize);

impl ActionIndex {
    /// Every action, in index order.
    pub const ALL: [ActionIndex; ACTION_COUNT] = [
        ActionIndex(0),
        ActionIndex(1),
        ActionIndex(2),
        ActionIndex(3),
        ActionIndex(4),
        ActionIndex(5),
    ];

    /// Checked constructor; `None` when `index` is outside the action set.
    pub fn new(index: usize) -> Option<Self> {
        (index < ACTION_COUNT).then_some(Self(index))
    }

    /// Position of this action in a `ValueRow`.
    pub fn index(self) -> usize {
        self.0
    }

    /// Human-readable identifier sent to clients.
    pub fn name(self) -> &'static str {
        ACTIONS[self.0]
    }

    /// Look an action up by its identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        ACTIONS.iter().position(|a| *a == name).map(Self)
    }
}

impl fmt::Display for ActionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Identifiers
// =============================================================================

/// Client-chosen bot identifier. Only meaningful within one connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct BotId(pub String);

impl BotId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BotId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BotId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Separator between bucket values in a state key. No bucket renders to it.
pub const STATE_KEY_SEPARATOR: char = '|';

/// Discretized observation, e.g. `"3|0|0|1|0"`.
///
/// Opaque to everything except the discretizer that builds it; persisted
/// tables use the string form as the map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(String);

impl StateKey {
    /// Join bucket values in field order.
    pub fn from_buckets(buckets: &[u8]) -> Self {
        let parts: Vec<String> = buckets.iter().map(u8::to_string).collect();
        Self(parts.join(&STATE_KEY_SEPARATOR.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StateKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for StateKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// =============================================================================
// Observation
// =============================================================================

/// Raw game observation as reported by a client.
///
/// Every field is optional on the wire. Numeric fields that are not finite
/// JSON numbers are treated as absent; flag fields follow JSON truthiness.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Observation {
    #[serde(deserialize_with = "serde_utils::lenient_number")]
    pub health: Option<f64>,
    #[serde(deserialize_with = "serde_utils::lenient_number")]
    pub ammo: Option<f64>,
    #[serde(deserialize_with = "serde_utils::lenient_number")]
    pub distance: Option<f64>,
    #[serde(deserialize_with = "serde_utils::truthy")]
    pub in_zone: bool,
    #[serde(deserialize_with = "serde_utils::truthy")]
    pub has_item: bool,
}

impl Observation {
    /// Create an observation with every field present.
    pub fn new(health: f64, ammo: f64, distance: f64, in_zone: bool, has_item: bool) -> Self {
        Self {
            health: Some(health),
            ammo: Some(ammo),
            distance: Some(distance),
            in_zone,
            has_item,
        }
    }
}
