//! The ingestion pipeline's binary entry point: loads configuration,
//! wires every component, and either runs one pass or serves the
//! control plane, per `--serve`.

mod orchestrator;
mod parse_upsert;
mod server_runner;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use govdata_retry::RetryJournal;
use govdata_transport::ReqwestTransport;
use govdata_types::{CliArgs, Config, ConfigError, Metrics};
use orchestrator::Orchestrator;
use server_runner::ServerRunner;
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let config = match Config::from_env_and_args(CliArgs::parse()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::from(config_error_code(&err));
        }
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "pipeline run failed");
            ExitCode::from(1)
        }
    }
}

fn config_error_code(_err: &ConfigError) -> u8 {
    2
}

async fn run(config: Config) -> anyhow::Result<()> {
    let pool = PgPoolOptions::new().max_connections(5).connect(&config.database_url).await?;
    govdata_store::run_migrations(&pool).await?;

    let transport = Arc::new(ReqwestTransport::new(config.source_api_key.clone()));
    let retry_journal = Arc::new(RetryJournal::new(config.retry_json.clone()));
    let metrics = Arc::new(Metrics::default());
    let serve = config.serve;
    let bind_addr = config.bind_addr;

    let orchestrator = Arc::new(Orchestrator { config, pool, transport, retry_journal, metrics: metrics.clone() });
    let cancel = CancellationToken::new();

    if serve {
        serve_control_plane(orchestrator, cancel, bind_addr, metrics).await
    } else {
        orchestrator.run_full(cancel).await?;
        Ok(())
    }
}

async fn serve_control_plane(
    orchestrator: Arc<Orchestrator>,
    cancel: CancellationToken,
    bind_addr: std::net::SocketAddr,
    metrics: Arc<Metrics>,
) -> anyhow::Result<()> {
    let runner = Arc::new(ServerRunner::new(orchestrator, cancel.clone()));
    let state = Arc::new(govdata_server::AppState::with_metrics(runner, metrics));
    let app = govdata_server::build_app(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(%bind_addr, "control server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received, cancelling in-flight work");
            cancel.cancel();
        })
        .await?;
    Ok(())
}
