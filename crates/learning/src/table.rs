//! The action-value table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Iter;

use types::{ACTION_COUNT, ActionIndex, StateKey, ValueRow};

/// Mapping from state key to one value per action.
///
/// Rows are created as all zeros the first time a key is touched and are
/// never removed. Serializes as a JSON object of `key -> [v0, .., v5]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueTable {
    rows: HashMap<StateKey, ValueRow>,
}

impl ValueTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Row for `key`, creating a zero row if absent.
    pub fn ensure(&mut self, key: &StateKey) -> &mut ValueRow {
        self.rows
            .entry(key.clone())
            .or_insert([0.0; ACTION_COUNT])
    }

    /// Row for `key` without creating it.
    pub fn get(&self, key: &StateKey) -> Option<&ValueRow> {
        self.rows.get(key)
    }

    /// Value of one action in one state, if the row exists.
    pub fn value(&self, key: &StateKey, action: ActionIndex) -> Option<f64> {
        self.rows.get(key).map(|row| row[action.index()])
    }

    /// Number of distinct state keys seen so far.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, StateKey, ValueRow> {
        self.rows.iter()
    }

    /// First state whose row holds a NaN or infinite value.
    ///
    /// JSON has no encoding for those, so such a table cannot be saved.
    pub fn first_non_finite(&self) -> Option<&StateKey> {
        self.rows
            .iter()
            .find(|(_, row)| row.iter().any(|v| !v.is_finite()))
            .map(|(key, _)| key)
    }
}

impl FromIterator<(StateKey, ValueRow)> for ValueTable {
    fn from_iter<I: IntoIterator<Item = (StateKey, ValueRow)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
