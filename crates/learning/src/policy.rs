//! Epsilon-greedy action selection.

use rand::Rng;

use types::{ACTION_COUNT, ActionIndex, StateKey, ValueRow};

use crate::table::ValueTable;

/// Pick an action for `key`.
///
/// With probability `exploration_rate` returns a uniformly random action;
/// otherwise the best-valued action, ties going to the lowest index. The
/// row is created if this is the first time `key` is seen.
pub fn select_action<R: Rng>(
    table: &mut ValueTable,
    exploration_rate: f64,
    key: &StateKey,
    rng: &mut R,
) -> ActionIndex {
    let row = table.ensure(key);
    if rng.r#gen::<f64>() < exploration_rate {
        ActionIndex::ALL[rng.gen_range(0..ACTION_COUNT)]
    } else {
        greedy(row)
    }
}

/// First action holding the maximum value of `row`.
pub fn greedy(row: &ValueRow) -> ActionIndex {
    let mut best = ActionIndex::ALL[0];
    for action in ActionIndex::ALL {
        if row[action.index()] > row[best.index()] {
            best = action;
        }
    }
    best
}
