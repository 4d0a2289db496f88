use serde::{Deserialize, Serialize};

/// Per-URL outcome of the downloader. `ok: true` implies
/// `local_path` is non-empty, `bytes_written >= 0`, and
/// `error_message` is `None` — callers should prefer
/// [`DownloadResult::success`]/[`DownloadResult::failure`] over
/// constructing this directly so that invariant holds by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadResult {
    pub url: String,
    pub local_path: String,
    pub ok: bool,
    pub bytes_written: u64,
    pub error_message: Option<String>,
    pub http_status: Option<u16>,
    pub attempts: u32,
}

impl DownloadResult {
    pub fn success(url: impl Into<String>, local_path: impl Into<String>, bytes_written: u64, attempts: u32) -> Self {
        Self {
            url: url.into(),
            local_path: local_path.into(),
            ok: true,
            bytes_written,
            error_message: None,
            http_status: None,
            attempts,
        }
    }

    pub fn failure(
        url: impl Into<String>,
        error_message: impl Into<String>,
        http_status: Option<u16>,
        attempts: u32,
    ) -> Self {
        Self {
            url: url.into(),
            local_path: String::new(),
            ok: false,
            bytes_written: 0,
            error_message: Some(error_message.into()),
            http_status,
            attempts,
        }
    }
}
