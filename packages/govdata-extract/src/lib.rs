//! The extractor: unpacks `.zip`, `.tar`, `.tar.gz`, `.tgz`
//! archives into a sibling `<file>_extracted` directory, refusing any
//! entry that would escape that directory.

mod safety;
mod tar_extract;
mod zip_extract;

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub use safety::is_safe_relative_path;

#[derive(Debug, Clone, Serialize)]
pub struct ExtractResult {
    pub ok: bool,
    pub destination: Option<PathBuf>,
    pub error: Option<String>,
}

impl ExtractResult {
    fn ok(destination: PathBuf) -> Self {
        Self { ok: true, destination: Some(destination), error: None }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self { ok: false, destination: None, error: Some(error.into()) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArchiveKind {
    Zip,
    Tar,
    TarGz,
}

fn archive_kind(path: &Path) -> Option<ArchiveKind> {
    let name = path.file_name()?.to_str()?.to_ascii_lowercase();
    if name.ends_with(".zip") {
        Some(ArchiveKind::Zip)
    } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        Some(ArchiveKind::TarGz)
    } else if name.ends_with(".tar") {
        Some(ArchiveKind::Tar)
    } else {
        None
    }
}

fn destination_for(archive_path: &Path) -> PathBuf {
    let file_name = archive_path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    archive_path.with_file_name(format!("{file_name}_extracted"))
}

/// Extracts one archive, creating `<file>_extracted` if absent.
/// `remove_after` deletes the archive once extraction succeeds (off by
/// default).
pub async fn extract_archive(archive_path: &Path, remove_after: bool) -> ExtractResult {
    let Some(kind) = archive_kind(archive_path) else {
        return ExtractResult::failed(format!("{} is not a recognized archive type", archive_path.display()));
    };
    let archive_path = archive_path.to_path_buf();
    let destination = destination_for(&archive_path);

    let result = tokio::task::spawn_blocking({
        let archive_path = archive_path.clone();
        let destination = destination.clone();
        move || extract_blocking(kind, &archive_path, &destination)
    })
    .await;

    let extracted = match result {
        Ok(Ok(())) => ExtractResult::ok(destination.clone()),
        Ok(Err(err)) => {
            tracing::warn!(archive = %archive_path.display(), error = %err, "archive extraction failed");
            ExtractResult::failed(err.to_string())
        }
        Err(join_err) => ExtractResult::failed(format!("extraction task panicked: {join_err}")),
    };

    if extracted.ok && remove_after {
        if let Err(err) = tokio::fs::remove_file(&archive_path).await {
            tracing::warn!(archive = %archive_path.display(), error = %err, "could not remove archive after extraction");
        }
    }
    extracted
}

fn extract_blocking(kind: ArchiveKind, archive_path: &Path, destination: &Path) -> io::Result<()> {
    std::fs::create_dir_all(destination)?;
    match kind {
        ArchiveKind::Zip => zip_extract::extract(archive_path, destination),
        ArchiveKind::Tar => tar_extract::extract_plain(archive_path, destination),
        ArchiveKind::TarGz => tar_extract::extract_gz(archive_path, destination),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_kind_recognizes_known_suffixes() {
        assert_eq!(archive_kind(Path::new("a.zip")), Some(ArchiveKind::Zip));
        assert_eq!(archive_kind(Path::new("a.tar.gz")), Some(ArchiveKind::TarGz));
        assert_eq!(archive_kind(Path::new("a.tgz")), Some(ArchiveKind::TarGz));
        assert_eq!(archive_kind(Path::new("a.tar")), Some(ArchiveKind::Tar));
        assert_eq!(archive_kind(Path::new("a.xml")), None);
    }

    #[test]
    fn destination_is_sibling_suffixed_directory() {
        let dest = destination_for(Path::new("/out/x/BILLSTATUS-118hr.zip"));
        assert_eq!(dest, Path::new("/out/x/BILLSTATUS-118hr.zip_extracted"));
    }

    #[tokio::test]
    async fn unrecognized_extension_fails_without_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        tokio::fs::write(&path, b"hello").await.unwrap();
        let result = extract_archive(&path, false).await;
        assert!(!result.ok);
    }

    #[tokio::test]
    async fn zip_traversal_entry_is_blocked() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("evil.zip");
        {
            let file = std::fs::File::create(&archive_path).unwrap();
            let mut writer = zip::ZipWriter::new(file);
            let options = zip::write::SimpleFileOptions::default();
            writer.start_file("../../etc/passwd", options).unwrap();
            use std::io::Write;
            writer.write_all(b"pwned").unwrap();
            writer.start_file("BILLSTATUS/118hr1.xml", options).unwrap();
            writer.write_all(b"<bill/>").unwrap();
            writer.finish().unwrap();
        }

        let result = extract_archive(&archive_path, false).await;
        assert!(result.ok);
        let destination = result.destination.unwrap();

        // nothing was written outside the extraction root
        assert!(!dir.path().join("../etc/passwd").exists());
        assert!(!destination.join("../../etc/passwd").exists());
        // the well-behaved entry was still extracted
        assert!(destination.join("BILLSTATUS/118hr1.xml").exists());
    }
}
