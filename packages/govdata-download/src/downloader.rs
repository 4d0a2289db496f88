use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use govdata_retry::RetryJournal;
use govdata_transport::{HeadInfo, HttpTransport, TransportError};
use govdata_types::{DownloadResult, Metrics};
use std::sync::atomic::Ordering;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

use crate::backoff::delay_for_attempt;
use crate::paths::local_path_for;

const HEAD_TIMEOUT: Duration = Duration::from_secs(20);
const GET_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub outroot: PathBuf,
    pub max_concurrency: usize,
    pub max_attempts: u32,
}

/// Runs the bounded-concurrency worker pool over `urls`. Results are returned in completion order, which the
/// caller treats as a set. A cancelled `cancel` token aborts in-flight
/// requests; partial files are left on disk for the next run to resume.
pub async fn download_all(
    urls: &[String],
    options: &DownloadOptions,
    transport: Arc<dyn HttpTransport>,
    retry_journal: Arc<RetryJournal>,
    metrics: Arc<Metrics>,
    cancel: CancellationToken,
) -> Vec<DownloadResult> {
    if urls.is_empty() {
        return Vec::new();
    }
    let concurrency = options.max_concurrency.max(1);
    stream::iter(urls.iter().cloned())
        .map(|url| {
            let options = options.clone();
            let transport = transport.clone();
            let retry_journal = retry_journal.clone();
            let metrics = metrics.clone();
            let cancel = cancel.clone();
            async move {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::info!(url, "download cancelled, leaving partial file in place");
                        None
                    }
                    result = download_one(&url, &options, transport.as_ref(), retry_journal.as_ref(), metrics.as_ref()) => Some(result),
                }
            }
        })
        .buffer_unordered(concurrency)
        .filter_map(|maybe_result| async move { maybe_result })
        .collect()
        .await
}

async fn download_one(
    url: &str,
    options: &DownloadOptions,
    transport: &dyn HttpTransport,
    retry_journal: &RetryJournal,
    metrics: &Metrics,
) -> DownloadResult {
    metrics.downloads_attempted_total.fetch_add(1, Ordering::Relaxed);
    metrics.active_workers.fetch_add(1, Ordering::Relaxed);
    let result = download_one_inner(url, options, transport, retry_journal).await;
    metrics.active_workers.fetch_sub(1, Ordering::Relaxed);
    if result.ok {
        metrics.downloads_succeeded_total.fetch_add(1, Ordering::Relaxed);
        metrics.bytes_written_total.fetch_add(result.bytes_written, Ordering::Relaxed);
    } else {
        metrics.downloads_failed_total.fetch_add(1, Ordering::Relaxed);
    }
    result
}

async fn download_one_inner(
    url: &str,
    options: &DownloadOptions,
    transport: &dyn HttpTransport,
    retry_journal: &RetryJournal,
) -> DownloadResult {
    let local_path = match local_path_for(&options.outroot, url) {
        Ok(path) => path,
        Err(err) => return DownloadResult::failure(url, format!("invalid url: {err}"), None, 0),
    };
    if let Some(parent) = local_path.parent() {
        if let Err(err) = tokio::fs::create_dir_all(parent).await {
            return DownloadResult::failure(url, format!("could not create directory: {err}"), None, 0);
        }
    }

    let probe: Option<HeadInfo> = transport.head(url, HEAD_TIMEOUT).await.ok();

    let existing_size = current_size(&local_path).await;
    if let Some(HeadInfo { content_length: Some(expected), .. }) = &probe {
        if existing_size == *expected {
            let _ = retry_journal.remove(url).await;
            return DownloadResult::success(url, local_path.display().to_string(), existing_size, 0);
        }
    }
    let accepts_ranges = probe.as_ref().map(|h| h.accepts_ranges).unwrap_or(false);

    let mut attempt = 0u32;
    loop {
        attempt += 1;
        let existing_size = current_size(&local_path).await;
        let range_from = if existing_size > 0 && accepts_ranges { Some(existing_size) } else { None };

        match transport.get(url, range_from, GET_TIMEOUT).await {
            Ok(response) => match write_body(&local_path, range_from.is_some(), response.body).await {
                Ok(written) => {
                    let _ = retry_journal.remove(url).await;
                    let total = if range_from.is_some() { existing_size + written } else { written };
                    return DownloadResult::success(url, local_path.display().to_string(), total, attempt);
                }
                Err(err) => {
                    if attempt >= options.max_attempts {
                        let _ = retry_journal.add(url, &err.to_string()).await;
                        return DownloadResult::failure(url, err.to_string(), None, attempt);
                    }
                    tokio::time::sleep(delay_for_attempt(attempt)).await;
                }
            },
            Err(err) => {
                if err.is_terminal() {
                    let _ = retry_journal.add(url, &err.to_string()).await;
                    return DownloadResult::failure(url, err.to_string(), err.status(), attempt);
                }
                if attempt >= options.max_attempts {
                    let _ = retry_journal.add(url, &err.to_string()).await;
                    return DownloadResult::failure(url, err.to_string(), err.status(), attempt);
                }
                tokio::time::sleep(delay_for_attempt(attempt)).await;
            }
        }
    }
}

async fn current_size(path: &std::path::Path) -> u64 {
    tokio::fs::metadata(path).await.map(|m| m.len()).unwrap_or(0)
}

async fn write_body(
    path: &std::path::Path,
    append: bool,
    mut body: govdata_transport::ByteStream,
) -> Result<u64, TransportError> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .await
        .map_err(|err| TransportError::Network(format!("could not open {}: {err}", path.display())))?;

    let mut written = 0u64;
    while let Some(chunk) = body.next().await {
        let bytes = chunk?;
        file.write_all(&bytes)
            .await
            .map_err(|err| TransportError::Network(format!("write failed: {err}")))?;
        written += bytes.len() as u64;
    }
    file.sync_all()
        .await
        .map_err(|err| TransportError::Network(format!("sync failed: {err}")))?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use govdata_transport::fake::{FakeGet, FakeTransport, FakeTransportError};

    fn options(dir: &tempfile::TempDir) -> DownloadOptions {
        DownloadOptions {
            outroot: dir.path().to_path_buf(),
            max_concurrency: 2,
            max_attempts: 3,
        }
    }

    fn journal(dir: &tempfile::TempDir) -> RetryJournal {
        RetryJournal::new(dir.path().join("retry.json"))
    }

    #[tokio::test]
    async fn single_url_happy_path() {
        let dir = tempfile::tempdir().unwrap();
        let transport = FakeTransport::new();
        let url = "https://fixture.test/file.bin";
        transport.push_head(
            url,
            Ok(HeadInfo { status: 200, content_length: Some(1024), accepts_ranges: true }),
        );
        transport.push_get(url, FakeGet::Ok { status: 200, body: vec![7u8; 1024] });

        let results = download_all(
            &[url.to_string()],
            &options(&dir),
            Arc::new(transport),
            Arc::new(journal(&dir)),
            Arc::new(Metrics::default()),
            CancellationToken::new(),
        )
        .await;

        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert!(result.ok);
        assert_eq!(result.bytes_written, 1024);
        assert_eq!(result.attempts, 1);
    }

    #[tokio::test]
    async fn resume_after_partial() {
        let dir = tempfile::tempdir().unwrap();
        let url = "https://fixture.test/partial.bin";
        let local_path = local_path_for(dir.path(), url).unwrap();
        tokio::fs::create_dir_all(local_path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&local_path, vec![1u8; 600]).await.unwrap();

        let transport = FakeTransport::new();
        transport.push_head(
            url,
            Ok(HeadInfo { status: 200, content_length: Some(1024), accepts_ranges: true }),
        );
        transport.push_get(url, FakeGet::Ok { status: 206, body: vec![2u8; 424] });

        let results = download_all(
            &[url.to_string()],
            &options(&dir),
            Arc::new(transport),
            Arc::new(journal(&dir)),
            Arc::new(Metrics::default()),
            CancellationToken::new(),
        )
        .await;

        let result = &results[0];
        assert!(result.ok);
        assert_eq!(result.attempts, 1);
        let final_size = tokio::fs::metadata(&local_path).await.unwrap().len();
        assert_eq!(final_size, 1024);
    }

    #[tokio::test]
    async fn permanent_failure_journals_once() {
        let dir = tempfile::tempdir().unwrap();
        let url = "https://fixture.test/missing.bin";
        let transport = FakeTransport::new();
        transport.push_head(url, Err(FakeTransportError::Status(404)));
        transport.push_get(url, FakeGet::Err(FakeTransportError::Status(404)));

        let retry_journal = journal(&dir);
        let results = download_all(
            &[url.to_string()],
            &options(&dir),
            Arc::new(transport),
            Arc::new(retry_journal),
            Arc::new(Metrics::default()),
            CancellationToken::new(),
        )
        .await;

        let result = &results[0];
        assert!(!result.ok);
        assert_eq!(result.attempts, 1);
        assert_eq!(result.http_status, Some(404));
    }

    #[tokio::test]
    async fn transient_then_success() {
        let dir = tempfile::tempdir().unwrap();
        let url = "https://fixture.test/flaky.bin";
        let transport = FakeTransport::new();
        transport.push_get(url, FakeGet::Err(FakeTransportError::Status(503)));
        transport.push_get(url, FakeGet::Err(FakeTransportError::Status(503)));
        transport.push_get(url, FakeGet::Ok { status: 200, body: vec![9u8; 512] });

        let mut opts = options(&dir);
        opts.max_attempts = 3;
        let results = download_all(
            &[url.to_string()],
            &opts,
            Arc::new(transport),
            Arc::new(journal(&dir)),
            Arc::new(Metrics::default()),
            CancellationToken::new(),
        )
        .await;

        let result = &results[0];
        assert!(result.ok);
        assert_eq!(result.attempts, 3);
        assert_eq!(result.bytes_written, 512);
    }

    #[tokio::test]
    async fn empty_url_list_returns_empty_results() {
        let dir = tempfile::tempdir().unwrap();
        let transport = FakeTransport::new();
        let results = download_all(
            &[],
            &options(&dir),
            Arc::new(transport),
            Arc::new(journal(&dir)),
            Arc::new(Metrics::default()),
            CancellationToken::new(),
        )
        .await;
        assert!(results.is_empty());
    }
}
