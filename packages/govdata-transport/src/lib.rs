//! The HTTP transport used by discovery, the validator, and the
//! downloader is an injected dependency: production code talks to [`ReqwestTransport`], tests
//! talk to an in-memory fake implementing the same trait.

pub mod fake;
pub mod reqwest_transport;

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use thiserror::Error;

pub use fake::FakeTransport;
pub use reqwest_transport::ReqwestTransport;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("server returned status {0}")]
    Status(u16),
}

impl TransportError {
    /// A 4xx other than 408/425/429 is terminal and must not be
    /// retried; everything else is transient.
    pub fn is_terminal(&self) -> bool {
        match self {
            TransportError::Status(status) => {
                (400..500).contains(status) && !matches!(status, 408 | 425 | 429)
            }
            _ => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status(status) => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadInfo {
    pub status: u16,
    pub content_length: Option<u64>,
    pub accepts_ranges: bool,
}

pub struct GetResponse {
    pub status: u16,
    pub content_length: Option<u64>,
    pub body: ByteStream,
}

/// The injected transport. `head`/`get` back the downloader and
/// validator; `get_text` backs discovery's HTML/JSON page fetches.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn head(&self, url: &str, timeout: Duration) -> Result<HeadInfo, TransportError>;

    /// `range_from` becomes a `Range: bytes=<n>-` header when present.
    async fn get(&self, url: &str, range_from: Option<u64>, timeout: Duration) -> Result<GetResponse, TransportError>;

    async fn get_text(&self, url: &str, timeout: Duration) -> Result<String, TransportError>;
}
