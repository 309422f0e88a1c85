//! One-step temporal-difference update.
//!
//! `Q(s,a) ← Q(s,a) + α [r + γ max_a' Q(s',a') − Q(s,a)]`

use types::{ActionIndex, StateKey, ValueRow};

use crate::table::ValueTable;

/// Apply one transition to the table and return the new `Q(s,a)`.
///
/// Both rows are created if absent. `reward` must be finite; callers
/// validate it at the transport boundary. Returns `None` and leaves the entry
/// unchanged when the result overflows to a non-finite value.
pub fn update(
    table: &mut ValueTable,
    state: &StateKey,
    action: ActionIndex,
    reward: f64,
    next_state: &StateKey,
    alpha: f64,
    gamma: f64,
) -> Option<f64> {
    let best_next = max_value(table.ensure(next_state));
    let row = table.ensure(state);
    let current = row[action.index()];
    let updated = current + alpha * (reward + gamma * best_next - current);
    if !updated.is_finite() {
        return None;
    }
    row[action.index()] = updated;
    Some(updated)
}

/// Largest value in a row.
pub fn max_value(row: &ValueRow) -> f64 {
    row.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
