use std::path::{Path, PathBuf};

use url::Url;

/// `<outroot>/<host-of-url>/<last-path-segment>`.
pub fn local_path_for(outroot: &Path, url: &str) -> anyhow::Result<PathBuf> {
    let parsed = Url::parse(url)?;
    let host = parsed.host_str().unwrap_or("unknown-host");
    let basename = parsed
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|s| !s.is_empty())
        .unwrap_or("index");
    Ok(outroot.join(host).join(basename))
}
