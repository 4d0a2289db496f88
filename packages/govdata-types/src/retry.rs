use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One URL's failure history in the retry journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryEntry {
    pub url: String,
    pub attempts: u32,
    pub first_failed_at: DateTime<Utc>,
    pub last_attempted_at: DateTime<Utc>,
    pub last_error: String,
}

impl RetryEntry {
    pub fn first_failure(url: impl Into<String>, error: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            url: url.into(),
            attempts: 1,
            first_failed_at: now,
            last_attempted_at: now,
            last_error: error.into(),
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.attempts >= 1 && self.first_failed_at <= self.last_attempted_at
    }
}

/// The retry journal document: `{failures: [entry...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetryJournalDoc {
    #[serde(default)]
    pub failures: Vec<RetryEntry>,
}

impl RetryJournalDoc {
    pub fn urls_are_unique(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.failures.iter().all(|entry| seen.insert(entry.url.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_failure_has_equal_timestamps() {
        let now = Utc::now();
        let entry = RetryEntry::first_failure("https://x", "timeout", now);
        assert!(entry.is_well_formed());
        assert_eq!(entry.attempts, 1);
    }

    #[test]
    fn doc_detects_duplicate_urls() {
        let now = Utc::now();
        let doc = RetryJournalDoc {
            failures: vec![
                RetryEntry::first_failure("https://x", "e1", now),
                RetryEntry::first_failure("https://x", "e2", now),
            ],
        };
        assert!(!doc.urls_are_unique());
    }
}
