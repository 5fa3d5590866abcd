use clap::Parser;
use std::path::PathBuf;

use lifeline::config::{read_config, validate_config, AppConfig, ConfigError};
use lifeline::lifecycle::startup;
use lifeline::observability::{logging, metrics};
use lifeline::WorkerError;

#[derive(Parser)]
#[command(name = "lifeline")]
#[command(about = "HTTP listener and signal watcher that start and stop together", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to serve HTTP on (overrides http.bind_address).
    #[arg(short, long)]
    bind: Option<String>,

    /// Seconds to drain in-flight requests on shutdown.
    #[arg(long)]
    grace_period_secs: Option<u64>,

    /// Log filter directives (overrides observability.log_filter).
    #[arg(long)]
    log_filter: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<AppConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => AppConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.http.bind_address = bind;
        }
        if let Some(secs) = self.grace_period_secs {
            config.shutdown.grace_period_secs = secs;
        }
        if let Some(filter) = self.log_filter {
            config.observability.log_filter = filter;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init_logging(&config.observability)?;

    tracing::info!("lifeline v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    match startup::run(&config).await {
        Ok(()) => tracing::info!("Shutdown complete"),
        Err(err) => match err.worker_error() {
            Some(WorkerError::ShutdownRequested { .. }) => {
                tracing::info!(reason = %err, "Shutdown complete")
            }
            _ => tracing::error!(error = %err, "Shutdown after failure"),
        },
    }

    Ok(())
}
