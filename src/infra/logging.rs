//! Tracing setup for the gateway. Output goes to stderr because stdout carries
//! MCP frames in stdio mode.

use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "info";

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// One upstream measurement, tagged with the WordPress host it was taken against.
pub fn log_metric(metric: &str, host: &str, value: f64) {
    tracing::info!(metric = metric, upstream = host, value = value, "metric");
}
