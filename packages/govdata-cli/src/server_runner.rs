use std::sync::Arc;

use govdata_server::{PipelineFuture, PipelineRunner, RunSummary};
use tokio_util::sync::CancellationToken;

use crate::orchestrator::Orchestrator;

/// Adapts [`Orchestrator`] to the control server's injected
/// [`PipelineRunner`] trait, tracking one cancellation token so a
/// future shutdown signal can reach an in-flight run.
pub struct ServerRunner {
    orchestrator: Arc<Orchestrator>,
    cancel: CancellationToken,
}

impl ServerRunner {
    pub fn new(orchestrator: Arc<Orchestrator>, cancel: CancellationToken) -> Self {
        Self { orchestrator, cancel }
    }
}

impl PipelineRunner for ServerRunner {
    fn run_full(&self) -> PipelineFuture {
        let orchestrator = self.orchestrator.clone();
        let cancel = self.cancel.clone();
        Box::pin(async move {
            let report = orchestrator.run_full(cancel).await?;
            Ok(RunSummary {
                discovery_url_count: report.discovery_url_count,
                retry_failures_count: report.retry_failures_count,
                retry_candidates_count: report.retry_candidates_count,
            })
        })
    }

    fn run_retry_only(&self) -> PipelineFuture {
        let orchestrator = self.orchestrator.clone();
        let cancel = self.cancel.clone();
        Box::pin(async move {
            let report = orchestrator.run_retry_only(cancel).await?;
            Ok(RunSummary {
                discovery_url_count: report.discovery_url_count,
                retry_failures_count: report.retry_failures_count,
                retry_candidates_count: report.retry_candidates_count,
            })
        })
    }
}
