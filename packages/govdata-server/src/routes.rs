use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::state::{AppState, Phase};

pub async fn health_handler() -> &'static str {
    "ok"
}

pub async fn status_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let status = state.status.lock().await.clone();
    Json(status)
}

pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render_prometheus(),
    )
}

pub async fn start_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    trigger_run(state, RunKind::Full).await
}

pub async fn retry_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    trigger_run(state, RunKind::RetryOnly).await
}

#[derive(Clone, Copy)]
enum RunKind {
    Full,
    RetryOnly,
}

async fn trigger_run(state: Arc<AppState>, kind: RunKind) -> axum::response::Response {
    let mut slot = state.run_slot.lock().await;
    if slot.is_some() {
        return (StatusCode::CONFLICT, Json(json!({"error": "a run is already in progress"}))).into_response();
    }

    let run_id = Uuid::new_v4();
    *slot = Some(run_id);
    drop(slot);

    {
        let mut status = state.status.lock().await;
        status.running = true;
        status.phase = match kind {
            RunKind::Full => Phase::Discovery,
            RunKind::RetryOnly => Phase::Download,
        };
        status.started_at = Some(Utc::now());
    }
    state.metrics.pipeline_running.store(1, std::sync::atomic::Ordering::Relaxed);

    let spawned_state = state.clone();
    tokio::spawn(async move {
        let started = std::time::Instant::now();
        let result = match kind {
            RunKind::Full => spawned_state.runner.run_full().await,
            RunKind::RetryOnly => spawned_state.runner.run_retry_only().await,
        };
        let elapsed = started.elapsed();

        match result {
            Ok(summary) => {
                tracing::info!(?run_id, discovered = summary.discovery_url_count, "run completed");
                let mut status = spawned_state.status.lock().await;
                status.last_discovery_url_count = summary.discovery_url_count;
                status.retry_failures_count = summary.retry_failures_count;
                drop(status);
                spawned_state.metrics.retry_candidates.store(summary.retry_candidates_count as i64, std::sync::atomic::Ordering::Relaxed);
            }
            Err(err) => {
                tracing::error!(?run_id, error = %err, "run failed");
            }
        }
        spawned_state.metrics.last_run_duration_seconds.store(elapsed.as_secs() as i64, std::sync::atomic::Ordering::Relaxed);

        let mut status = spawned_state.status.lock().await;
        status.running = false;
        status.phase = Phase::Idle;
        drop(status);
        spawned_state.metrics.pipeline_running.store(0, std::sync::atomic::Ordering::Relaxed);
        *spawned_state.run_slot.lock().await = None;
    });

    (StatusCode::ACCEPTED, Json(json!({"run_id": run_id}))).into_response()
}
