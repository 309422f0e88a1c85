//! Tabular action-value learning core for Arena RL.
//!
//! Everything in this crate is synchronous and free of I/O except
//! [`store`]. The server wraps it with locking, transport and timers.
//!
//! # Decision / update loop
//!
//! ```text
//! observation ─▶ discretize ─▶ StateKey ─▶ select_action ─▶ ActionIndex
//!                                   │                            │
//!                                   └──── SessionTracker::record_decision
//!
//! reward + next observation ─▶ SessionTracker::consume_decision
//!                          ─▶ discretize(next) ─▶ learner::update
//! ```
//!
//! # Modules
//!
//! - [`discretizer`]: observation → state key bucketing
//! - [`table`]: the value table and its rows
//! - [`policy`]: epsilon-greedy action selection
//! - [`learner`]: one-step temporal-difference update
//! - [`session`]: per-connection pending decisions
//! - [`exploration`]: process-wide exploration rate with decay
//! - [`store`]: persistence sink/source for the table
//! - [`config`]: learning hyperparameters

pub mod config;
pub mod discretizer;
pub mod error;
pub mod exploration;
pub mod learner;
pub mod policy;
pub mod session;
pub mod store;
pub mod table;

pub use config::LearningConfig;
pub use discretizer::discretize;
pub use error::{LearningError, Result};
pub use exploration::ExplorationRate;
pub use learner::update;
pub use policy::select_action;
pub use session::{PendingDecision, SessionTracker};
pub use store::{JsonFileStore, MemoryStore, TableStore};
pub use table::ValueTable;
