//! Tracing subscriber setup.
//!
//! Production deployments get one JSON object per line so the log shipper can
//! index the structured fields (`source`, `kind`, `overall_percent`, ...).
//! Everything else gets ANSI-coloured, human-readable output.

use crate::config::get_environment;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn for_environment(env: &str) -> Self {
        match env {
            "production" | "prod" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Install the global subscriber for the current `APP_ENV`.
///
/// `RUST_LOG` overrides the default `info` filter. Calling this twice is a
/// no-op apart from a message on stderr.
pub fn init_logging() {
    let format = LogFormat::for_environment(&get_environment());
    if let Err(e) = try_init_logging(format) {
        eprintln!("logging already initialised: {e}");
    }
}

pub fn try_init_logging(
    format: LogFormat,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stdout),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .try_init(),
    }
}
