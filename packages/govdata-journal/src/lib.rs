//! Atomic JSON document storage.
//!
//! Two operations: a safe load that never fails on a missing or corrupt
//! file, and an atomic write that never leaves a reader observing a
//! partial document — writers go through a sibling temp file and a
//! rename, matching the pattern the store crate uses for its own
//! durability guarantees.

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

/// Loads and parses `path` as JSON. Returns `T::default()` (via
/// `Default`, through [`serde_json::from_str`] never being invoked) if
/// the file is missing or its contents do not parse — this component
/// never throws for corruption
pub fn safe_load<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "journal document is corrupt, using empty default");
            T::default()
        }),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "journal document missing, using empty default");
            T::default()
        }
    }
}

/// Serializes `doc` and writes it to `path` atomically: the bytes land
/// in a sibling temp file in the same directory first, are flushed, and
/// the temp file is renamed over `path`. A reader of `path` always
/// observes either the prior consistent contents or the new ones, never
/// a partial write, because rename within one filesystem is atomic.
pub async fn atomic_write<T>(path: &Path, doc: &T) -> anyhow::Result<()>
where
    T: Serialize,
{
    let json = serde_json::to_vec_pretty(doc)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp_path = sibling_tmp_path(path);
    {
        use tokio::io::AsyncWriteExt;
        let mut file = tokio::fs::File::create(&tmp_path).await?;
        file.write_all(&json).await?;
        file.sync_all().await?;
    }
    tokio::fs::rename(&tmp_path, path).await?;
    Ok(())
}

fn sibling_tmp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "journal".to_string());
    let tmp_name = format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4());
    path.with_file_name(tmp_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Doc {
        count: u32,
        names: Vec<String>,
    }

    #[test]
    fn safe_load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let doc: Doc = safe_load(&path);
        assert_eq!(doc, Doc::default());
    }

    #[test]
    fn safe_load_corrupt_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.json");
        std::fs::write(&path, b"{not json").unwrap();
        let doc: Doc = safe_load(&path);
        assert_eq!(doc, Doc::default());
    }

    #[tokio::test]
    async fn round_trips_through_atomic_write_and_safe_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let doc = Doc {
            count: 3,
            names: vec!["a".into(), "b".into()],
        };
        atomic_write(&path, &doc).await.unwrap();
        let back: Doc = safe_load(&path);
        assert_eq!(doc, back);
    }

    #[tokio::test]
    async fn atomic_write_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        atomic_write(&path, &Doc::default()).await.unwrap();
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn atomic_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");
        atomic_write(&path, &Doc::default()).await.unwrap();
        assert!(path.exists());
    }
}
