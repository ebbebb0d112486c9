//! Structured logging setup.
//!
//! Diagnostics go to stderr through `tracing`; stdout is reserved for the tool's own output
//! (the saved document, the tree listing, generated file paths).
//!
//! `RUST_LOG` takes precedence. Without it the level comes from `COBRAGEN_LOG_LEVEL`
//! (default `warn`) and `COBRAGEN_LOG_FORMAT` picks `compact` (default), `pretty` or `json`.

use std::env;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Output format of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Include file:line location
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            log_level: "warn".to_string(),
            format: LogFormat::Compact,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Read `COBRAGEN_LOG_LEVEL`, `COBRAGEN_LOG_FORMAT` and `COBRAGEN_LOG_LOCATION`
    pub fn from_env() -> Self {
        let defaults = LogConfig::default();
        LogConfig {
            log_level: env::var("COBRAGEN_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: env::var("COBRAGEN_LOG_FORMAT")
                .map(|f| LogFormat::parse(&f))
                .unwrap_or(defaults.format),
            include_location: env::var("COBRAGEN_LOG_LOCATION")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.include_location),
        }
    }

    /// Raise the level to at least `debug` (used by `--verbose`)
    pub fn verbose(mut self) -> Self {
        // tracing orders levels by verbosity: TRACE is the greatest.
        if self.level() < Level::DEBUG {
            self.log_level = "debug".to_string();
        }
        self
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    }
}

/// Install the global subscriber
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level().as_str()));

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("PRETTY"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("invalid"), LogFormat::Compact);
    }

    #[test]
    fn test_default_level_is_warn() {
        let config = LogConfig::default();
        assert_eq!(config.level(), Level::WARN);
    }

    #[test]
    fn test_verbose_raises_level() {
        let config = LogConfig::default().verbose();
        assert_eq!(config.level(), Level::DEBUG);

        let trace = LogConfig {
            log_level: "trace".to_string(),
            ..LogConfig::default()
        }
        .verbose();
        assert_eq!(trace.level(), Level::TRACE);
    }
}
