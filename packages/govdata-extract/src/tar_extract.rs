use std::fs::File;
use std::io;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::{Archive, EntryType};

use crate::safety::is_safe_relative_path;

pub fn extract_plain(archive_path: &Path, destination: &Path) -> io::Result<()> {
    let file = File::open(archive_path)?;
    extract_from(Archive::new(file), destination)
}

pub fn extract_gz(archive_path: &Path, destination: &Path) -> io::Result<()> {
    let file = File::open(archive_path)?;
    extract_from(Archive::new(GzDecoder::new(file)), destination)
}

fn extract_from<R: io::Read>(mut archive: Archive<R>, destination: &Path) -> io::Result<()> {
    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.to_path_buf();

        if !is_safe_relative_path(&path) {
            tracing::warn!(path = %path.display(), "tar entry escapes extraction root, skipping");
            continue;
        }
        match entry.header().entry_type() {
            EntryType::Symlink => {
                tracing::warn!(path = %path.display(), "tar entry is a symlink, skipping");
                continue;
            }
            // Conservative: any hard-link entry is skipped rather than
            // resolving whether its target stays within the root.
            EntryType::Link => {
                tracing::warn!(path = %path.display(), "tar entry is a hard link, skipping");
                continue;
            }
            _ => {}
        }

        let out_path = destination.join(&path);
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        entry.unpack(&out_path)?;
    }
    Ok(())
}
