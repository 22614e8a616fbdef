use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use common::types::Health;
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn welcome() -> Json<Value> {
    Json(json!({ "message": "Welcome to FundX backend!" }))
}

fn snapshot(state: &AppState) -> Health {
    Health {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: state.started_at.elapsed().as_secs_f64(),
        environment: state.environment.clone(),
        version: VERSION,
        database: None,
    }
}

pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(snapshot(&state))
}

/// Same as `/health` plus a database ping.
pub async fn detailed(State(state): State<AppState>) -> Json<Health> {
    let mut h = snapshot(&state);
    h.database = Some(match state.db.ping().await {
        Ok(()) => "up",
        Err(e) => {
            warn!(error = %e, "database ping failed");
            "down"
        }
    });
    Json(h)
}
