//! Inspection API.
//!
//! - `GET /api/stats` - Known states, exploration rate, hyperparameters, counters
//! - `POST /api/save` - Persist the value table immediately
//! - `GET /api/states/{key}` - Action values for one state (key is URL-encoded,
//!   e.g. `3%7C0%7C0%7C1%7C0`)
//!
//! All handlers are read-only except `save`, and none of them create rows.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use learning::policy::greedy;
use types::{ActionIndex, StateKey};

use crate::error::{AppError, AppResult};
use crate::state::{MetricsSnapshot, ServerState};

/// Service statistics response.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Distinct state keys in the table.
    pub states: usize,
    /// Current exploration rate.
    pub exploration_rate: f64,
    /// Learning rate.
    pub alpha: f64,
    /// Discount factor.
    pub gamma: f64,
    /// Service counters.
    pub metrics: MetricsSnapshot,
}

/// Get service statistics: `GET /api/stats`
pub async fn get_stats(State(state): State<ServerState>) -> Json<StatsResponse> {
    let coordinator = &state.coordinator;
    let config = coordinator.config();

    Json(StatsResponse {
        states: coordinator.state_count(),
        exploration_rate: coordinator.exploration_rate(),
        alpha: config.alpha,
        gamma: config.gamma,
        metrics: state.metrics.snapshot(),
    })
}

/// Save response.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    /// Whether the table was written.
    pub ok: bool,
    /// Number of states written.
    pub states: usize,
}

/// Persist the table now: `POST /api/save`
pub async fn post_save(State(state): State<ServerState>) -> AppResult<Json<SaveResponse>> {
    let states = state.coordinator.persist().await?;
    Ok(Json(SaveResponse { ok: true, states }))
}

/// One action's value in a state.
#[derive(Debug, Serialize)]
pub struct ActionValue {
    pub action: &'static str,
    pub value: f64,
}

/// Values for one state.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub key: String,
    pub values: Vec<ActionValue>,
    /// Action the policy picks when exploiting.
    pub best: &'static str,
}

/// Get one state's row: `GET /api/states/{key}`
pub async fn get_state(
    State(state): State<ServerState>,
    Path(key): Path<String>,
) -> AppResult<Json<StateResponse>> {
    let key = StateKey::from(key);
    let row = state
        .coordinator
        .row(&key)
        .ok_or_else(|| AppError::NotFound(format!("state {}", key)))?;

    let values = ActionIndex::ALL
        .iter()
        .map(|a| ActionValue {
            action: a.name(),
            value: row[a.index()],
        })
        .collect();

    Ok(Json(StateResponse {
        key: key.to_string(),
        values,
        best: greedy(&row).name(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::{Coordinator, Session};
    use learning::{LearningConfig, MemoryStore};
    use std::sync::Arc;
    use types::Observation;

    fn server_state(store: Arc<MemoryStore>) -> ServerState {
        let coordinator = Coordinator::new(LearningConfig::default(), store);
        ServerState::new(Arc::new(coordinator))
    }

    #[tokio::test]
    async fn test_stats_reports_state_count() {
        let state = server_state(Arc::new(MemoryStore::new()));
        let mut session = Session::with_seed(1);
        state
            .coordinator
            .decide(&mut session, "b1".into(), &Observation::default());
        state.coordinator.decide(
            &mut session,
            "b2".into(),
            &Observation::new(80.0, 0.0, 5.0, true, false),
        );

        let Json(stats) = get_stats(State(state)).await;
        assert_eq!(stats.states, 2);
        assert_eq!(stats.metrics.decisions, 2);
        assert!((stats.exploration_rate - 0.25).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_save_endpoint() {
        let store = Arc::new(MemoryStore::new());
        let state = server_state(store.clone());

        let Json(resp) = post_save(State(state)).await.unwrap();
        assert!(resp.ok);
        assert_eq!(resp.states, 0);
        assert_eq!(store.contents().as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_save_endpoint_failure_is_internal_error() {
        let state = server_state(Arc::new(MemoryStore::failing()));
        let err = post_save(State(state)).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_get_state_unknown_is_not_found() {
        let state = server_state(Arc::new(MemoryStore::new()));
        let err = get_state(State(state.clone()), Path("9|9|9|9|9".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        // lookup must not create the row
        assert_eq!(state.coordinator.state_count(), 0);
    }

    #[tokio::test]
    async fn test_get_state_lists_all_actions() {
        let state = server_state(Arc::new(MemoryStore::new()));
        let mut session = Session::with_seed(2);
        state.coordinator.decide(
            &mut session,
            "b1".into(),
            &Observation::new(80.0, 0.0, 5.0, true, false),
        );

        let Json(resp) = get_state(State(state), Path("3|0|0|1|0".to_string()))
            .await
            .unwrap();
        assert_eq!(resp.key, "3|0|0|1|0");
        assert_eq!(resp.values.len(), types::ACTION_COUNT);
        assert_eq!(resp.values[0].action, "attack");
        assert_eq!(resp.best, "attack");
    }
}
