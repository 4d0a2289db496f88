use std::path::PathBuf;
use std::sync::Arc;

use govdata_download::{download_all, validate, DownloadOptions};
use govdata_retry::RetryJournal;
use govdata_transport::HttpTransport;
use govdata_types::{Config, Metrics, UrlInventory};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::parse_upsert::parse_and_upsert_tree;

/// Everything this binary needs to run a phase sequence. One
/// instance is shared between the CLI's one-shot run and every
/// control-server-triggered run.
pub struct Orchestrator {
    pub config: Config,
    pub pool: PgPool,
    pub transport: Arc<dyn HttpTransport>,
    pub retry_journal: Arc<RetryJournal>,
    pub metrics: Arc<Metrics>,
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub discovery_url_count: usize,
    pub retry_failures_count: usize,
    pub retry_candidates_count: usize,
}

impl Orchestrator {
    /// discovery → (validate) → download → extract → parse+upsert,
    /// each phase skippable per the config flags. `dry_run`
    /// stops right after discovery.
    pub async fn run_full(&self, cancel: CancellationToken) -> anyhow::Result<RunReport> {
        let mut urls = self.load_or_discover_urls().await?;
        let discovery_url_count = urls.len();

        if let Some(limit) = self.config.limit {
            urls.truncate(limit);
        }

        if self.config.dry_run {
            tracing::info!(count = discovery_url_count, "dry run: discovery complete, stopping");
            return Ok(self.report(discovery_url_count).await);
        }

        if self.config.validate_before_download {
            urls = validate(&urls, self.transport.as_ref()).await;
        }

        let downloaded = if self.config.download_enabled {
            let options = DownloadOptions {
                outroot: self.config.outdir.clone(),
                max_concurrency: self.config.max_concurrency,
                max_attempts: self.config.max_retries,
            };
            download_all(&urls, &options, self.transport.clone(), self.retry_journal.clone(), self.metrics.clone(), cancel).await
        } else {
            Vec::new()
        };

        let successful_paths: Vec<PathBuf> = downloaded.iter().filter(|r| r.ok).map(|r| PathBuf::from(&r.local_path)).collect();

        let mut postprocess_roots = successful_paths.clone();
        if self.config.extract_enabled {
            for path in &successful_paths {
                let result = govdata_extract::extract_archive(path, self.config.remove_archives).await;
                if result.ok {
                    if let Some(destination) = result.destination {
                        postprocess_roots.push(destination);
                    }
                }
            }
        }

        if self.config.postprocess_enabled {
            for root in &postprocess_roots {
                parse_and_upsert_tree(&self.pool, root).await;
            }
        }

        Ok(self.report(discovery_url_count).await)
    }

    /// Runs the downloader over the retry journal's candidates only
    /// (the control server's `/retry`).
    pub async fn run_retry_only(&self, cancel: CancellationToken) -> anyhow::Result<RunReport> {
        let candidates = self.retry_journal.candidates(self.config.max_retries).await;
        if !candidates.is_empty() {
            let options = DownloadOptions {
                outroot: self.config.outdir.clone(),
                max_concurrency: self.config.max_concurrency,
                max_attempts: self.config.max_retries,
            };
            download_all(&candidates, &options, self.transport.clone(), self.retry_journal.clone(), self.metrics.clone(), cancel).await;
        }
        Ok(self.report(0).await)
    }

    async fn load_or_discover_urls(&self) -> anyhow::Result<Vec<String>> {
        let inventory = if self.config.discovery_enabled {
            let inventory = govdata_discovery::discover(&self.config, self.transport.as_ref()).await;
            govdata_journal::atomic_write(&self.config.bulk_json, &inventory).await?;
            inventory
        } else {
            govdata_journal::safe_load::<UrlInventory>(&self.config.bulk_json)
        };
        Ok(inventory.aggregate_urls.into_iter().collect())
    }

    async fn report(&self, discovery_url_count: usize) -> RunReport {
        let retry_candidates_count = self.retry_journal.candidates(self.config.max_retries).await.len();
        RunReport {
            discovery_url_count,
            retry_failures_count: self.retry_journal.failure_count().await,
            retry_candidates_count,
        }
    }
}
