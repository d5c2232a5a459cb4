use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ingestion_node::adapters::{
    JsonLinesPublisher, JsonLinesSource, LoggingDeadLetterSink, RdpcClient, RdpcConfig,
};
use ingestion_node::application::{
    AnalysisPipeline, AnalysisResolver, PipelineSettings, RetryPolicy,
};
use ingestion_node::config::{AppConfig, LogFormat};
use ingestion_node::domain::analysis::AcceptanceFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load_validated()?;
    init_tracing(&config.pipeline.log_level, config.pipeline.log_format);

    info!(
        registry = %config.registry.url,
        inbound_mode = %config.pipeline.inbound_mode,
        max_in_flight = config.pipeline.max_in_flight,
        max_attempts = config.retry.max_attempts,
        "Starting ingestion node"
    );

    let mut registry_config =
        RdpcConfig::new(config.registry.url.clone()).with_timeout(config.registry.timeout());
    if let Some(token) = config.registry.auth_token.take() {
        registry_config = registry_config.with_auth_token(token);
    }
    let registry = Arc::new(RdpcClient::new(registry_config)?);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let policy = RetryPolicy::fixed(config.retry.max_attempts, config.retry.backoff())
        .with_multiplier(config.retry.backoff_multiplier)
        .with_max_backoff(config.retry.max_backoff());
    let resolver = AnalysisResolver::new(registry, policy).with_shutdown(shutdown_rx.clone());

    let filter = AcceptanceFilter::new(
        config.acceptance.analysis_types_list(),
        config.acceptance.analysis_states_list(),
    )?;

    let pipeline = Arc::new(
        AnalysisPipeline::new(
            resolver,
            filter,
            Arc::new(JsonLinesPublisher::new(tokio::io::stdout())),
        )
        .with_dead_letter_sink(Arc::new(LoggingDeadLetterSink))
        .with_settings(
            PipelineSettings::default()
                .with_max_in_flight(config.pipeline.max_in_flight)
                .with_content_type(config.pipeline.content_type.clone()),
        ),
    );

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Shutdown requested");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
        }
    });

    let inbound = JsonLinesSource::new(tokio::io::stdin(), config.pipeline.inbound_mode).into_stream();
    let stats = pipeline.run(inbound, shutdown_rx).await;

    info!(
        received = stats.received,
        emitted = stats.emitted,
        rejected = stats.rejected,
        failed = stats.failed,
        cancelled = stats.cancelled,
        completed = stats.completed(),
        "Ingestion node stopped"
    );

    Ok(())
}

/// Logs go to stderr so stdout stays a clean event stream.
fn init_tracing(default_level: &str, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_level.into());

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
