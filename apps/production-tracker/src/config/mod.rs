//! Configuration module for the production tracker.
//!
//! Loads a YAML file, interpolates environment variables and validates the
//! result before anything is wired.
//!
//! # Usage
//!
//! ```rust,ignore
//! use production_tracker::config::load_config;
//!
//! // Load from TRACKER_CONFIG, or config.yaml when unset
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! println!("HTTP port: {}", config.server.http_port);
//! ```

mod business;
mod observability;
mod server;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use business::BusinessConfig;
pub use observability::{LogFormat, LoggingConfig, MetricsSettings, ObservabilityConfig};
pub use server::ServerConfig;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "TRACKER_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Business configuration.
    #[serde(default)]
    pub business: BusinessConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to `$TRACKER_CONFIG`,
///   then "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(
        || std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string()),
        str::to_string,
    );

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.http_port == 0 {
        return Err(ConfigError::ValidationError(
            "server.http_port must be non-zero".to_string(),
        ));
    }
    if config.server.socket_addr().is_err() {
        return Err(ConfigError::ValidationError(format!(
            "server.bind_address must be an IP address, got '{}'",
            config.server.bind_address
        )));
    }

    let metrics = &config.observability.metrics;
    if metrics.enabled {
        if metrics.port == 0 {
            return Err(ConfigError::ValidationError(
                "observability.metrics.port must be non-zero".to_string(),
            ));
        }
        if metrics.port == config.server.http_port {
            return Err(ConfigError::ValidationError(
                "observability.metrics.port and server.http_port must be different".to_string(),
            ));
        }
    }

    let business = &config.business;
    if business.max_order_amount <= rust_decimal::Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "business.max_order_amount must be positive".to_string(),
        ));
    }
    business.to_rules()?;

    let currency = &business.currency;
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ConfigError::ValidationError(format!(
            "business.currency must be three uppercase letters, got '{currency}'"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.observability.logging.format, LogFormat::Json);
        assert!(!config.observability.metrics.enabled);
        assert_eq!(config.business.currency, "INR");
        assert_eq!(config.business.recent_orders, 5);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_minimal_config() {
        let yaml = r"
server:
  http_port: 9000
";

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load minimal config: {e}"),
        };
        assert_eq!(config.server.http_port, 9000);
        assert_eq!(config.observability.logging.level, "info");
    }

    #[test]
    fn test_load_full_config() {
        let yaml = r"
server:
  http_port: 8000
  bind_address: 127.0.0.1
observability:
  logging:
    level: debug
    format: pretty
  metrics:
    enabled: true
    port: 9100
business:
  currency: USD
  max_order_amount: 2500.50
  recent_orders: 10
";

        let config = load_config_from_string(yaml).unwrap();
        assert_eq!(config.observability.logging.format, LogFormat::Pretty);
        assert!(config.observability.metrics.enabled);
        let rules = config.business.to_rules().unwrap();
        assert_eq!(rules.max_order_amount.minor_units(), 250_050);
        assert_eq!(rules.recent_orders, 10);
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "level: ${TRACKER_CONFIG_TEST_NONEXISTENT_VAR:-warn}";
        assert_eq!(interpolate_env_vars(input), "level: warn");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax, not format args
    fn test_env_var_with_default_uses_existing() {
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);

        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "currency: ${TRACKER_CONFIG_TEST_UNLIKELY_TO_EXIST}";
        assert_eq!(interpolate_env_vars(input), "currency: ");
    }

    #[test]
    fn test_validation_same_ports() {
        let yaml = r"
server:
  http_port: 9090
observability:
  metrics:
    enabled: true
    port: 9090
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for duplicate ports");
        };
        assert!(err.to_string().contains("must be different"));
    }

    #[test]
    fn test_validation_bind_address_must_be_ip() {
        let yaml = r"
server:
  bind_address: shop.local
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for hostname bind address");
        };
        assert!(err.to_string().contains("bind_address"));
    }

    #[test]
    fn test_validation_bad_currency() {
        let yaml = r"
business:
  currency: rupees
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for invalid currency");
        };
        assert!(err.to_string().contains("currency"));
    }

    #[test]
    fn test_validation_non_positive_max_amount() {
        let yaml = r"
business:
  max_order_amount: 0
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for zero max amount");
        };
        assert!(err.to_string().contains("max_order_amount"));
    }

    #[test]
    fn test_invalid_log_format_is_a_parse_error() {
        let yaml = r"
observability:
  logging:
    format: xml
";

        assert!(matches!(
            load_config_from_string(yaml),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server:\n  http_port: 8123").unwrap();

        let config = load_config(file.path().to_str()).unwrap();
        assert_eq!(config.server.http_port, 8123);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        assert!(matches!(
            load_config(path.to_str()),
            Err(ConfigError::ReadError { .. })
        ));
    }
}
