//! Logging setup.
//!
//! Installs a `tracing-subscriber` formatter with an `EnvFilter`. The level
//! comes from configuration unless `RUST_LOG` is set.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Error type for tracing operations.
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    /// The configured level is not a valid filter directive.
    #[error("invalid log filter '{filter}': {message}")]
    InvalidFilter {
        /// The rejected filter.
        filter: String,
        /// Parser message.
        message: String,
    },
    /// Failed to initialize tracing subscriber.
    #[error("failed to initialize tracing subscriber: {0}")]
    SubscriberError(String),
}

/// Build the filter: `RUST_LOG` when set, otherwise the configured level.
///
/// # Errors
///
/// Returns an error if the configured level does not parse.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, TracingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| TracingError::InvalidFilter {
        filter: config.level.clone(),
        message: e.to_string(),
    })
}

/// Initialize the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TracingError> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match config.format {
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    result.map_err(|e| TracingError::SubscriberError(e.to_string()))
}
