use clap::Parser;
use metrics_exporter_statsd::StatsdBuilder;
use tracing_subscriber::EnvFilter;

mod config;

use config::{Config, MetricsConfig};

#[derive(Parser)]
#[command(name = "vanityd", about = "Vanity import path resolver")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, default_value = "config.yaml")]
    config: std::path::PathBuf,
}

#[derive(thiserror::Error, Debug)]
enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("could not install metrics recorder: {0}")]
    Metrics(String),
    #[error("service error: {0}")]
    Service(#[from] vanity::errors::VanityError),
}

fn install_statsd(metrics: &MetricsConfig) -> Result<(), ServerError> {
    let recorder = StatsdBuilder::from(metrics.statsd_host.as_str(), metrics.statsd_port)
        .build(Some("vanity"))
        .map_err(|e| ServerError::Metrics(e.to_string()))?;
    metrics::set_global_recorder(recorder).map_err(|e| ServerError::Metrics(e.to_string()))?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_file(&cli.config)?;

    if let Some(metrics) = &config.metrics {
        install_statsd(metrics)?;
    }

    tracing::info!(config = %cli.config.display(), "starting vanity resolver");
    vanity::run(config.vanity).await?;

    Ok(())
}
