//! Arena RL - Main binary
//!
//! Serves the online learning loop to game clients over WebSocket.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  observation / reward  ┌───────────────────┐
//! │ game client  │ ─────────────────────▶ │  /ws connection   │
//! │  (many)      │ ◀───────────────────── │  task + Session   │
//! └──────────────┘        action          └─────────┬─────────┘
//!                                                   │
//!                   ┌───────────────┐      ┌────────▼────────┐
//!                   │ autosave task │ ───▶ │   Coordinator   │ ───▶ qtable.json
//!                   └───────────────┘ tick └─────────────────┘
//! ```
//!
//! On Ctrl-C the server stops accepting connections, drains, and writes the
//! table one last time.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use learning::{JsonFileStore, LearningConfig, TableStore};
use server::{Coordinator, ServerState, create_app, spawn_autosave};

use config::{AppConfig, RawSettings};

/// Arena RL - online tabular reinforcement learning for game bots
#[derive(Parser, Debug)]
#[command(name = "arena-rl")]
#[command(about = "Online tabular reinforcement-learning service for game bots")]
#[command(version)]
struct Args {
    /// Host to bind to
    #[arg(long, env = "ARENA_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port for WebSocket and HTTP
    #[arg(long, env = "ARENA_PORT", default_value_t = 8080)]
    port: u16,

    /// Value table file (loaded at startup, overwritten on save)
    #[arg(long, env = "ARENA_TABLE_PATH", default_value = "data/qtable.json")]
    table_path: PathBuf,

    /// Seconds between autosaves (each autosave also decays epsilon)
    #[arg(long, env = "ARENA_AUTOSAVE_SECS", default_value_t = LearningConfig::default().autosave_interval.as_secs())]
    autosave_secs: u64,

    /// Learning rate
    #[arg(long, env = "ARENA_ALPHA", default_value_t = LearningConfig::default().alpha)]
    alpha: f64,

    /// Discount factor
    #[arg(long, env = "ARENA_GAMMA", default_value_t = LearningConfig::default().gamma)]
    gamma: f64,

    /// Initial exploration rate
    #[arg(long, env = "ARENA_EPSILON", default_value_t = LearningConfig::default().epsilon)]
    epsilon: f64,

    /// Exploration decay factor per autosave tick
    #[arg(long, env = "ARENA_EPSILON_DECAY", default_value_t = LearningConfig::default().epsilon_decay)]
    epsilon_decay: f64,

    /// Exploration rate floor
    #[arg(long, env = "ARENA_EPSILON_FLOOR", default_value_t = LearningConfig::default().epsilon_floor)]
    epsilon_floor: f64,
}

impl Args {
    fn into_settings(self) -> RawSettings {
        RawSettings {
            host: self.host,
            port: self.port,
            table_path: self.table_path,
            autosave_secs: self.autosave_secs,
            alpha: self.alpha,
            gamma: self.gamma,
            epsilon: self.epsilon,
            epsilon_decay: self.epsilon_decay,
            epsilon_floor: self.epsilon_floor,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_settings(Args::parse().into_settings())?;
    info!(
        bind = %config.server.bind_addr(),
        table = %config.table_path.display(),
        alpha = config.learning.alpha,
        gamma = config.learning.gamma,
        epsilon = config.learning.epsilon,
        autosave_secs = config.learning.autosave_interval.as_secs(),
        "Arena RL starting"
    );

    let store: Arc<dyn TableStore> = Arc::new(JsonFileStore::new(&config.table_path));
    let coordinator = Arc::new(Coordinator::new(config.learning.clone(), store));
    let autosave = spawn_autosave(Arc::clone(&coordinator));

    let app = create_app(ServerState::new(Arc::clone(&coordinator)));
    let listener = tokio::net::TcpListener::bind(config.server.bind_addr()).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    autosave.abort();
    if let Err(e) = coordinator.persist().await {
        warn!(error = %e, "final save failed");
    }
    info!(states = coordinator.state_count(), "Arena RL stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
