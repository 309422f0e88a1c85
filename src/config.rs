//! Central configuration for the Arena RL service.
//!
//! Command-line flags (with environment fallbacks) are folded into one
//! validated `AppConfig` here.

use std::path::PathBuf;
use std::time::Duration;

use learning::{LearningConfig, LearningError};
use server::ServerConfig;

/// Master configuration for the service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Network
    // ─────────────────────────────────────────────────────────────────────────
    /// Listen address for WebSocket and HTTP.
    pub server: ServerConfig,

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────────────────────
    /// JSON file the value table is loaded from and saved to.
    pub table_path: PathBuf,

    // ─────────────────────────────────────────────────────────────────────────
    // Learning
    // ─────────────────────────────────────────────────────────────────────────
    /// Hyperparameters and autosave period.
    pub learning: LearningConfig,
}

/// Raw values as they come off the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSettings {
    pub host: String,
    pub port: u16,
    pub table_path: PathBuf,
    pub autosave_secs: u64,
    pub alpha: f64,
    pub gamma: f64,
    pub epsilon: f64,
    pub epsilon_decay: f64,
    pub epsilon_floor: f64,
}

impl AppConfig {
    /// Build and validate a config from raw settings.
    pub fn from_settings(raw: RawSettings) -> Result<Self, LearningError> {
        let learning = LearningConfig::new()
            .alpha(raw.alpha)
            .gamma(raw.gamma)
            .epsilon(raw.epsilon)
            .epsilon_decay(raw.epsilon_decay, raw.epsilon_floor)
            .autosave_interval(Duration::from_secs(raw.autosave_secs));
        learning.validate()?;

        Ok(Self {
            server: ServerConfig {
                port: raw.port,
                host: raw.host,
            },
            table_path: raw.table_path,
            learning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawSettings {
        RawSettings {
            host: "127.0.0.1".into(),
            port: 9000,
            table_path: PathBuf::from("/tmp/q.json"),
            autosave_secs: 15,
            alpha: 0.2,
            gamma: 0.9,
            epsilon: 0.3,
            epsilon_decay: 0.99,
            epsilon_floor: 0.05,
        }
    }

    #[test]
    fn test_from_settings() {
        let config = AppConfig::from_settings(raw()).unwrap();
        assert_eq!(config.server.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.table_path, PathBuf::from("/tmp/q.json"));
        assert_eq!(config.learning.alpha, 0.2);
        assert_eq!(config.learning.gamma, 0.9);
        assert_eq!(config.learning.epsilon, 0.3);
        assert_eq!(config.learning.epsilon_floor, 0.05);
        assert_eq!(config.learning.autosave_interval, Duration::from_secs(15));
    }

    #[test]
    fn test_from_settings_rejects_invalid() {
        let bad = RawSettings {
            gamma: 1.5,
            ..raw()
        };
        assert!(matches!(
            AppConfig::from_settings(bad),
            Err(LearningError::InvalidConfig(_))
        ));

        let bad = RawSettings {
            autosave_secs: 0,
            ..raw()
        };
        assert!(AppConfig::from_settings(bad).is_err());
    }
}
