//! An in-memory [`HttpTransport`] test double for deterministic,
//! network-free download and discovery tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;

use crate::{ByteStream, GetResponse, HeadInfo, HttpTransport, TransportError};

#[derive(Clone)]
pub enum FakeGet {
    Ok { status: u16, body: Vec<u8> },
    Err(FakeTransportError),
}

/// A cloneable mirror of [`TransportError`] so fixtures can be
/// constructed and reused without consuming the real error type.
#[derive(Clone, Debug)]
pub enum FakeTransportError {
    Network(String),
    Timeout,
    Status(u16),
}

impl From<FakeTransportError> for TransportError {
    fn from(err: FakeTransportError) -> Self {
        match err {
            FakeTransportError::Network(msg) => TransportError::Network(msg),
            FakeTransportError::Timeout => TransportError::Timeout,
            FakeTransportError::Status(status) => TransportError::Status(status),
        }
    }
}

#[derive(Default)]
pub struct FakeTransport {
    heads: Mutex<HashMap<String, VecDeque<Result<HeadInfo, FakeTransportError>>>>,
    gets: Mutex<HashMap<String, VecDeque<FakeGet>>>,
    texts: Mutex<HashMap<String, Result<String, FakeTransportError>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_head(&self, url: impl Into<String>, head: Result<HeadInfo, FakeTransportError>) {
        self.heads.lock().unwrap().entry(url.into()).or_default().push_back(head);
    }

    pub fn push_get(&self, url: impl Into<String>, response: FakeGet) {
        self.gets.lock().unwrap().entry(url.into()).or_default().push_back(response);
    }

    pub fn set_text(&self, url: impl Into<String>, text: Result<String, FakeTransportError>) {
        self.texts.lock().unwrap().insert(url.into(), text);
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn head(&self, url: &str, _timeout: Duration) -> Result<HeadInfo, TransportError> {
        let mut heads = self.heads.lock().unwrap();
        let queue = heads.entry(url.to_string()).or_default();
        match queue.pop_front() {
            Some(Ok(head)) => {
                if queue.is_empty() {
                    // leave the last-known response available for repeated probes
                    queue.push_back(Ok(head.clone()));
                }
                Ok(head)
            }
            Some(Err(err)) => Err(err.into()),
            None => Err(TransportError::Status(404)),
        }
    }

    async fn get(&self, url: &str, range_from: Option<u64>, _timeout: Duration) -> Result<GetResponse, TransportError> {
        let next = {
            let mut gets = self.gets.lock().unwrap();
            let queue = gets.entry(url.to_string()).or_default();
            queue.pop_front()
        };
        match next {
            Some(FakeGet::Ok { status, body }) => {
                let (status, bytes) = match range_from {
                    Some(start) if (start as usize) < body.len() => (206, body[start as usize..].to_vec()),
                    Some(start) if (start as usize) >= body.len() => (206, Vec::new()),
                    _ => (status, body),
                };
                let content_length = Some(bytes.len() as u64);
                let body: ByteStream = Box::pin(stream::once(async move { Ok(bytes::Bytes::from(bytes)) }));
                Ok(GetResponse {
                    status,
                    content_length,
                    body,
                })
            }
            Some(FakeGet::Err(err)) => Err(err.into()),
            None => Err(TransportError::Status(404)),
        }
    }

    async fn get_text(&self, url: &str, _timeout: Duration) -> Result<String, TransportError> {
        let texts = self.texts.lock().unwrap();
        match texts.get(url) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(err)) => Err(err.clone().into()),
            None => Err(TransportError::Status(404)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_sequence_drains_in_order() {
        let fake = FakeTransport::new();
        fake.push_get("https://x", FakeGet::Err(FakeTransportError::Status(503)));
        fake.push_get("https://x", FakeGet::Ok { status: 200, body: vec![1, 2, 3] });

        let first = fake.get("https://x", None, Duration::from_secs(1)).await;
        assert!(matches!(first, Err(TransportError::Status(503))));

        let second = fake.get("https://x", None, Duration::from_secs(1)).await.unwrap();
        assert_eq!(second.status, 200);
    }

    #[tokio::test]
    async fn range_request_slices_body() {
        let fake = FakeTransport::new();
        fake.push_get(
            "https://x",
            FakeGet::Ok {
                status: 200,
                body: (0..10u8).collect(),
            },
        );
        let response = fake.get("https://x", Some(6), Duration::from_secs(1)).await.unwrap();
        assert_eq!(response.status, 206);
        assert_eq!(response.content_length, Some(4));
    }
}
