use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;

use crate::{GetResponse, HeadInfo, HttpTransport, TransportError};

/// Production transport backed by `reqwest`. One client is shared across
/// all callers so connection pooling actually helps.
pub struct ReqwestTransport {
    client: Client,
    api_key: Option<String>,
}

impl ReqwestTransport {
    pub fn new(api_key: Option<String>) -> Self {
        let client = Client::builder()
            .build()
            .expect("reqwest client with default TLS backend must build");
        Self { client, api_key }
    }

    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

fn map_transport_err(err: reqwest::Error) -> TransportError {
    let mapped = if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(err.to_string())
    };
    tracing::debug!(error = %err, "transport request failed");
    mapped
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn head(&self, url: &str, timeout: Duration) -> Result<HeadInfo, TransportError> {
        let builder = self.apply_auth(self.client.head(url)).timeout(timeout);
        let response = builder.send().await.map_err(map_transport_err)?;
        let status = response.status().as_u16();
        let content_length = response
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let accepts_ranges = response
            .headers()
            .get(reqwest::header::ACCEPT_RANGES)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.eq_ignore_ascii_case("bytes"))
            .unwrap_or(false);
        if status >= 400 && status != 405 {
            return Err(TransportError::Status(status));
        }
        Ok(HeadInfo {
            status,
            content_length,
            accepts_ranges,
        })
    }

    async fn get(&self, url: &str, range_from: Option<u64>, timeout: Duration) -> Result<GetResponse, TransportError> {
        let mut builder = self.apply_auth(self.client.get(url)).timeout(timeout);
        if let Some(start) = range_from {
            builder = builder.header(reqwest::header::RANGE, format!("bytes={start}-"));
        }
        let response = builder.send().await.map_err(map_transport_err)?;
        let status = response.status().as_u16();
        if status >= 400 {
            return Err(TransportError::Status(status));
        }
        if status != 200 && status != 206 {
            return Err(TransportError::Status(status));
        }
        let content_length = response.content_length();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(map_transport_err))
            .boxed();
        Ok(GetResponse {
            status,
            content_length,
            body,
        })
    }

    async fn get_text(&self, url: &str, timeout: Duration) -> Result<String, TransportError> {
        let builder = self.apply_auth(self.client.get(url)).timeout(timeout);
        let response = builder.send().await.map_err(map_transport_err)?;
        let status = response.status().as_u16();
        if status >= 400 {
            return Err(TransportError::Status(status));
        }
        response.text().await.map_err(map_transport_err)
    }
}
