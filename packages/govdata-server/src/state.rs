use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use govdata_types::Metrics;
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

pub type PipelineFuture = Pin<Box<dyn Future<Output = anyhow::Result<RunSummary>> + Send>>;

/// `govdata-cli` supplies the concrete implementation; the control
/// server only ever sees this trait, so it never depends on the
/// orchestrator crate directly.
pub trait PipelineRunner: Send + Sync {
    fn run_full(&self) -> PipelineFuture;
    fn run_retry_only(&self) -> PipelineFuture;
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub discovery_url_count: usize,
    pub retry_failures_count: usize,
    pub retry_candidates_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Discovery,
    Validate,
    Download,
    Extract,
    Parse,
}

/// Everything `/status` reports, guarded by one mutex the server holds
/// only briefly per read/write.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub running: bool,
    pub phase: Phase,
    pub retry_failures_count: usize,
    pub last_discovery_url_count: usize,
    pub started_at: Option<DateTime<Utc>>,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self { running: false, phase: Phase::Idle, retry_failures_count: 0, last_discovery_url_count: 0, started_at: None }
    }
}

/// The single run-slot mutex: `None` means no run is in
/// progress. Holding this lock across an entire pipeline run is
/// deliberate — it is the one sanctioned process-wide mutable
/// singleton besides the retry journal's lock.
pub struct AppState {
    pub runner: Arc<dyn PipelineRunner>,
    pub run_slot: Mutex<Option<Uuid>>,
    pub status: Mutex<StatusSnapshot>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(runner: Arc<dyn PipelineRunner>) -> Self {
        Self::with_metrics(runner, Arc::new(Metrics::default()))
    }

    pub fn with_metrics(runner: Arc<dyn PipelineRunner>, metrics: Arc<Metrics>) -> Self {
        Self { runner, run_slot: Mutex::new(None), status: Mutex::new(StatusSnapshot::default()), metrics }
    }
}
