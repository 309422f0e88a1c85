//! Server crate: Axum-based WebSocket and HTTP front end for Arena RL.
//!
//! Connects game clients to the learning core and owns the shared value table.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐        ┌──────────────────────────┐
//! │  WebSocket task      │        │  Coordinator (shared)    │
//! │  (one per client)    │        │                          │
//! │                      │        │  Mutex<ValueTable>       │
//! │  Session {           │ ─────▶ │  ExplorationRate         │
//! │    SessionTracker,   │ handle │  Arc<dyn TableStore>     │
//! │    rng               │ ◀───── │                          │
//! │  }                   │ reply  └──────────────────────────┘
//! └──────────────────────┘                  ▲
//!                                           │ tick(): save + decay
//!                                  ┌──────────────────┐
//!                                  │ autosave task    │
//!                                  └──────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Axum application builder and router setup
//! - [`state`]: Shared server state and metrics
//! - [`error`]: Unified error handling with HTTP status codes
//! - [`coordinator`]: Per-message orchestration over the shared table
//! - [`autosave`]: Periodic persistence and exploration decay
//! - [`routes`]: HTTP and WebSocket handlers

pub mod app;
pub mod autosave;
pub mod coordinator;
pub mod error;
pub mod routes;
pub mod state;

// Re-exports for convenience
pub use app::{ServerConfig, create_app};
pub use autosave::spawn_autosave;
pub use coordinator::{Coordinator, Session};
pub use error::{AppError, AppResult};
pub use state::{ServerMetrics, ServerState};
