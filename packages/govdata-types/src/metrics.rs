use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// The counters and gauges `/metrics` reports, each a plain atomic
/// rather than a dependency on a metrics crate — the surface is small
/// and fixed, so hand-rolled state is simpler than a framework. Shared
/// by the downloader/orchestrator (writers) and the control server
/// (renderer), so it lives where every crate can already reach it.
#[derive(Default)]
pub struct Metrics {
    pub downloads_attempted_total: AtomicU64,
    pub downloads_succeeded_total: AtomicU64,
    pub downloads_failed_total: AtomicU64,
    pub bytes_written_total: AtomicU64,
    pub retry_candidates: AtomicI64,
    pub active_workers: AtomicI64,
    pub pipeline_running: AtomicI64,
    pub last_run_duration_seconds: AtomicI64,
}

impl Metrics {
    pub fn render_prometheus(&self) -> String {
        format!(
            "# TYPE downloads_attempted_total counter\n\
             downloads_attempted_total {}\n\
             # TYPE downloads_succeeded_total counter\n\
             downloads_succeeded_total {}\n\
             # TYPE downloads_failed_total counter\n\
             downloads_failed_total {}\n\
             # TYPE bytes_written_total counter\n\
             bytes_written_total {}\n\
             # TYPE retry_candidates gauge\n\
             retry_candidates {}\n\
             # TYPE active_workers gauge\n\
             active_workers {}\n\
             # TYPE pipeline_running gauge\n\
             pipeline_running {}\n\
             # TYPE last_run_duration_seconds gauge\n\
             last_run_duration_seconds {}\n",
            self.downloads_attempted_total.load(Ordering::Relaxed),
            self.downloads_succeeded_total.load(Ordering::Relaxed),
            self.downloads_failed_total.load(Ordering::Relaxed),
            self.bytes_written_total.load(Ordering::Relaxed),
            self.retry_candidates.load(Ordering::Relaxed),
            self.active_workers.load(Ordering::Relaxed),
            self.pipeline_running.load(Ordering::Relaxed),
            self.last_run_duration_seconds.load(Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_all_documented_series() {
        let metrics = Metrics::default();
        metrics.downloads_attempted_total.store(3, Ordering::Relaxed);
        let rendered = metrics.render_prometheus();
        assert!(rendered.contains("downloads_attempted_total 3"));
        assert!(rendered.contains("pipeline_running 0"));
    }
}
