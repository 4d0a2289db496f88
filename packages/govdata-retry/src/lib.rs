//! The retry journal: three operations over the durable ledger
//! of per-URL download failures, serialized through a process-wide
//! lock because the journal file is not safe to share across
//! processes.

use std::path::PathBuf;

use chrono::Utc;
use govdata_types::{RetryEntry, RetryJournalDoc};
use tokio::sync::Mutex;

pub struct RetryJournal {
    path: PathBuf,
    lock: Mutex<()>,
}

impl RetryJournal {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub async fn load(&self) -> RetryJournalDoc {
        let _guard = self.lock.lock().await;
        govdata_journal::safe_load(&self.path)
    }

    /// Increments `attempts` for an existing entry, or creates a new
    /// one with `attempts = 1`.
    pub async fn add(&self, url: &str, error_message: &str) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut doc: RetryJournalDoc = govdata_journal::safe_load(&self.path);
        let now = Utc::now();
        if let Some(entry) = doc.failures.iter_mut().find(|e| e.url == url) {
            entry.attempts += 1;
            entry.last_attempted_at = now;
            entry.last_error = error_message.to_string();
            tracing::debug!(url, attempts = entry.attempts, "retry journal: attempt recorded");
        } else {
            doc.failures.push(RetryEntry::first_failure(url, error_message, now));
            tracing::debug!(url, "retry journal: new failure recorded");
        }
        govdata_journal::atomic_write(&self.path, &doc).await
    }

    /// URLs with `attempts < max_attempts`.
    pub async fn candidates(&self, max_attempts: u32) -> Vec<String> {
        let doc = self.load().await;
        doc.failures
            .into_iter()
            .filter(|entry| entry.attempts < max_attempts)
            .map(|entry| entry.url)
            .collect()
    }

    /// Deletes the entry for `url` if present; a no-op otherwise.
    pub async fn remove(&self, url: &str) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut doc: RetryJournalDoc = govdata_journal::safe_load(&self.path);
        let before = doc.failures.len();
        doc.failures.retain(|entry| entry.url != url);
        if doc.failures.len() != before {
            govdata_journal::atomic_write(&self.path, &doc).await?;
        }
        Ok(())
    }

    pub async fn failure_count(&self) -> usize {
        self.load().await.failures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn journal() -> (tempfile::TempDir, RetryJournal) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("retry_report.json");
        let journal = RetryJournal::new(path);
        (dir, journal)
    }

    #[tokio::test]
    async fn add_creates_entry_with_one_attempt() {
        let (_dir, journal) = journal();
        journal.add("https://x", "timeout").await.unwrap();
        let doc = journal.load().await;
        assert_eq!(doc.failures.len(), 1);
        assert_eq!(doc.failures[0].attempts, 1);
        assert!(doc.failures[0].is_well_formed());
    }

    #[tokio::test]
    async fn add_increments_existing_entry() {
        let (_dir, journal) = journal();
        journal.add("https://x", "timeout").await.unwrap();
        journal.add("https://x", "connection reset").await.unwrap();
        let doc = journal.load().await;
        assert_eq!(doc.failures.len(), 1);
        assert_eq!(doc.failures[0].attempts, 2);
        assert_eq!(doc.failures[0].last_error, "connection reset");
    }

    #[tokio::test]
    async fn candidates_filters_by_max_attempts() {
        let (_dir, journal) = journal();
        journal.add("https://a", "e").await.unwrap();
        for _ in 0..3 {
            journal.add("https://b", "e").await.unwrap();
        }
        let candidates = journal.candidates(3).await;
        assert_eq!(candidates, vec!["https://a".to_string()]);
    }

    #[tokio::test]
    async fn remove_deletes_entry_and_is_idempotent() {
        let (_dir, journal) = journal();
        journal.add("https://x", "e").await.unwrap();
        journal.remove("https://x").await.unwrap();
        assert_eq!(journal.failure_count().await, 0);
        // removing again is a no-op, not an error
        journal.remove("https://x").await.unwrap();
    }

    #[tokio::test]
    async fn urls_stay_unique_across_repeated_adds() {
        let (_dir, journal) = journal();
        for _ in 0..5 {
            journal.add("https://x", "e").await.unwrap();
        }
        let doc = journal.load().await;
        assert!(doc.urls_are_unique());
        assert_eq!(doc.failures[0].attempts, 5);
    }
}
