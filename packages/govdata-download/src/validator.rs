use std::time::Duration;

use futures::StreamExt;
use govdata_transport::{HttpTransport, TransportError};

const HEAD_TIMEOUT: Duration = Duration::from_secs(20);
const RANGED_GET_TIMEOUT: Duration = Duration::from_secs(20);

/// The reachability filter. Never mutates the input; returns the
/// subset that passes.
pub async fn validate(urls: &[String], transport: &dyn HttpTransport) -> Vec<String> {
    let mut passed = Vec::with_capacity(urls.len());
    for url in urls {
        if is_reachable(url, transport).await {
            passed.push(url.clone());
        } else {
            tracing::debug!(url, "validator dropped unreachable url");
        }
    }
    passed
}

async fn is_reachable(url: &str, transport: &dyn HttpTransport) -> bool {
    match transport.head(url, HEAD_TIMEOUT).await {
        Ok(head) if head.status < 400 => true,
        Ok(head) if head.status == 405 => ranged_get_passes(url, transport).await,
        Err(TransportError::Network(_)) | Err(TransportError::Timeout) => {
            ranged_get_passes(url, transport).await
        }
        _ => false,
    }
}

async fn ranged_get_passes(url: &str, transport: &dyn HttpTransport) -> bool {
    match transport.get(url, Some(0), RANGED_GET_TIMEOUT).await {
        Ok(mut response) => {
            // Drain a single chunk (the "first few kilobytes") and
            // drop the rest of the stream; we only care about status.
            let _ = response.body.next().await;
            response.status < 400
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govdata_transport::fake::{FakeGet, FakeTransport, FakeTransportError};
    use govdata_transport::HeadInfo;

    #[tokio::test]
    async fn head_success_passes() {
        let transport = FakeTransport::new();
        transport.push_head(
            "https://x",
            Ok(HeadInfo {
                status: 200,
                content_length: Some(10),
                accepts_ranges: true,
            }),
        );
        let result = validate(&["https://x".to_string()], &transport).await;
        assert_eq!(result, vec!["https://x".to_string()]);
    }

    #[tokio::test]
    async fn head_405_falls_back_to_ranged_get() {
        let transport = FakeTransport::new();
        transport.push_head(
            "https://x",
            Ok(HeadInfo {
                status: 405,
                content_length: None,
                accepts_ranges: false,
            }),
        );
        transport.push_get("https://x", FakeGet::Ok { status: 200, body: vec![1, 2, 3] });
        let result = validate(&["https://x".to_string()], &transport).await;
        assert_eq!(result, vec!["https://x".to_string()]);
    }

    #[tokio::test]
    async fn transport_error_falls_back_then_fails() {
        let transport = FakeTransport::new();
        transport.push_head("https://x", Err(FakeTransportError::Network("dns".into())));
        transport.push_get("https://x", FakeGet::Err(FakeTransportError::Status(500)));
        let result = validate(&["https://x".to_string()], &transport).await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn permanent_4xx_fails_without_fallback() {
        let transport = FakeTransport::new();
        transport.push_head("https://x", Err(FakeTransportError::Status(404)));
        let result = validate(&["https://x".to_string()], &transport).await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn never_mutates_input_order() {
        let transport = FakeTransport::new();
        transport.push_head("https://a", Ok(HeadInfo { status: 200, content_length: None, accepts_ranges: false }));
        transport.push_head("https://b", Ok(HeadInfo { status: 200, content_length: None, accepts_ranges: false }));
        let input = vec!["https://a".to_string(), "https://b".to_string()];
        let result = validate(&input, &transport).await;
        assert_eq!(result, input);
    }
}
