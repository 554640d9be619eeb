//! Logging setup, powered by tracing-subscriber.
//!
//! A `tracing_log::LogTracer` bridge routes `log::*` calls (used by the
//! store) through the same subscriber as `tracing` events.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{JobtrackError, Result};

/// Third-party targets that are pinned to `warn` regardless of level.
const NOISY_TARGETS: &[&str] = &["actix_server", "actix_web", "h2", "hyper", "hyper_util", "reqwest", "rustls"];

/// Builds the filter from `RUST_LOG` if set, otherwise from `level` plus
/// the noisy-crate overrides.
pub fn build_env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut directives = vec![level.to_ascii_lowercase()];
    for target in NOISY_TARGETS {
        directives.push(format!("{}=warn", target));
    }

    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str).map_err(|e| {
        JobtrackError::Logging(format!("Invalid tracing filter '{}': {}", filter_str, e))
    })
}

/// Installs the global subscriber. Output goes to stderr so the terminal
/// client's screen on stdout stays clean.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = build_env_filter(&config.level)?;

    // Already initialized is fine (tests, repeated setup).
    tracing_log::LogTracer::init().ok();

    let layer = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(layer.with_filter(filter));
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| JobtrackError::Logging(e.to_string()))?;

    tracing::debug!(level = %config.level, format = %config.format, "Logging initialized");
    Ok(())
}
