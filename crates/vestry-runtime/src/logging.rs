#![forbid(unsafe_code)]

//! Structured JSON logging.
//!
//! Available with the `tracing-json` feature. The filter comes from
//! `VESTRY_LOG` (standard `EnvFilter` directives) and defaults to `info`.

use std::fmt;

use tracing_subscriber::EnvFilter;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "VESTRY_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

/// The global subscriber could not be installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingError(String);

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to install tracing subscriber: {}", self.0)
    }
}

impl std::error::Error for LoggingError {}

/// Filter from `VESTRY_LOG`, or `info` when unset or invalid.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install a global JSON subscriber writing to stdout.
///
/// Fails if a global subscriber is already set.
pub fn init() -> Result<(), LoggingError> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter())
        .with_current_span(true)
        .try_init()
        .map_err(|e| LoggingError(e.to_string()))?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "vestry logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_fails_cleanly() {
        // Another test may already have installed a subscriber; either way the
        // second call must report an error instead of panicking.
        let _ = init();
        let err = init().unwrap_err();
        assert!(err.to_string().starts_with("failed to install tracing subscriber"));
    }
}
