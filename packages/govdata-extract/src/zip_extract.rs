use std::fs::File;
use std::io;
use std::path::Path;

use crate::safety::is_safe_relative_path;

const UNIX_SYMLINK_MODE: u32 = 0o120000;

pub fn extract(archive_path: &Path, destination: &Path) -> io::Result<()> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

        let Some(name) = entry.enclosed_name() else {
            tracing::warn!(index = i, "zip entry has an unsafe path, skipping");
            continue;
        };
        if !is_safe_relative_path(&name) {
            tracing::warn!(path = %name.display(), "zip entry escapes extraction root, skipping");
            continue;
        }
        if is_symlink(&entry) {
            tracing::warn!(path = %name.display(), "zip entry is a symlink, skipping");
            continue;
        }

        let out_path = destination.join(&name);
        if entry.is_dir() {
            std::fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out_file = File::create(&out_path)?;
        io::copy(&mut entry, &mut out_file)?;
    }
    Ok(())
}

fn is_symlink(entry: &zip::read::ZipFile) -> bool {
    entry.unix_mode().map(|mode| mode & 0o170000 == UNIX_SYMLINK_MODE).unwrap_or(false)
}
