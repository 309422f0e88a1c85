//! Route handlers for the server.
//!
//! # Modules
//!
//! - [`health`]: Liveness endpoint
//! - [`ws`]: WebSocket handler carrying the learning protocol
//! - [`api`]: Read-only inspection and on-demand persistence

pub mod api;
pub mod health;
pub mod ws;
