//! The control server: a small axum surface with a single-run-
//! slot mutex guarding the orchestrator. Cancellation on shutdown is the
//! caller's responsibility — `build_app` only wires routes.

mod routes;
mod state;

use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use govdata_types::Metrics;
pub use state::{AppState, PipelineFuture, PipelineRunner, Phase, RunSummary, StatusSnapshot};

pub fn build_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(tower_http::cors::Any).allow_methods([Method::GET, Method::POST]);

    Router::new()
        .route("/health", get(routes::health_handler))
        .route("/status", get(routes::status_handler))
        .route("/start", post(routes::start_handler))
        .route("/retry", post(routes::retry_handler))
        .route("/metrics", get(routes::metrics_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower::ServiceExt;

    use super::*;

    struct InstantRunner;

    impl PipelineRunner for InstantRunner {
        fn run_full(&self) -> PipelineFuture {
            Box::pin(async { Ok(RunSummary { discovery_url_count: 3, retry_failures_count: 0, retry_candidates_count: 0 }) })
        }

        fn run_retry_only(&self) -> PipelineFuture {
            Box::pin(async { Ok(RunSummary { discovery_url_count: 0, retry_failures_count: 1, retry_candidates_count: 1 }) })
        }
    }

    struct SlowRunner;

    impl PipelineRunner for SlowRunner {
        fn run_full(&self) -> PipelineFuture {
            Box::pin(async {
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
                Ok(RunSummary { discovery_url_count: 3, retry_failures_count: 0, retry_candidates_count: 0 })
            })
        }

        fn run_retry_only(&self) -> PipelineFuture {
            Box::pin(async { Ok(RunSummary { discovery_url_count: 0, retry_failures_count: 0, retry_candidates_count: 0 }) })
        }
    }

    fn test_app() -> Router {
        build_app(Arc::new(AppState::new(Arc::new(InstantRunner))))
    }

    #[tokio::test]
    async fn health_returns_200() {
        let response = test_app()
            .oneshot(axum::http::Request::builder().uri("/health").body(axum::body::Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn start_returns_202_then_409_while_running() {
        let app = build_app(Arc::new(AppState::new(Arc::new(SlowRunner))));

        let first =
            app.clone().oneshot(axum::http::Request::builder().method("POST").uri("/start").body(axum::body::Body::empty()).unwrap()).await.unwrap();
        assert_eq!(first.status(), axum::http::StatusCode::ACCEPTED);

        let second =
            app.oneshot(axum::http::Request::builder().method("POST").uri("/start").body(axum::body::Body::empty()).unwrap()).await.unwrap();
        assert_eq!(second.status(), axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn status_reports_idle_before_any_run() {
        let response = test_app()
            .oneshot(axum::http::Request::builder().uri("/status").body(axum::body::Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}
