//! Logging setup for the CLI: tracing-subscriber with an env filter, pretty or JSON output.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
    #[error("logging already initialised: {0}")]
    Init(#[from] TryInitError),
}

/// Output format of log lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Install the global subscriber. Level comes from `RUST_LOG`, else `default_level`.
/// Logs go to stderr so resolved URLs on stdout stay clean.
pub fn init_logging(format: LogFormat, default_level: &str) -> Result<(), LoggingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))?;
    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .try_init()?,
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_target(false).with_writer(std::io::stderr))
            .try_init()?,
    }
    Ok(())
}
