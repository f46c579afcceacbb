//! Structured logging setup
//!
//! Logs go to stderr so stdout stays free for reports and dry-run output.
//!
//! | variable | values | default |
//! |---|---|---|
//! | `CRUDFORGE_LOG_LEVEL` | trace/debug/info/warn/error | `info` |
//! | `CRUDFORGE_LOG_FORMAT` | pretty/json | `pretty` |
//! | `CRUDFORGE_LOG_TARGET_FILTER` | comma-separated `EnvFilter` directives | none |
//! | `CRUDFORGE_LOG_INCLUDE_LOCATION` | true/false | `false` |
//!
//! `RUST_LOG`, when set, replaces the level.

use anyhow::Result;
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for machines, pretty-print for terminals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Extra filter directives (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("CRUDFORGE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: LogFormat::parse(
                &env::var("CRUDFORGE_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            ),
            target_filter: env::var("CRUDFORGE_LOG_TARGET_FILTER").ok(),
            include_location: env::var("CRUDFORGE_LOG_INCLUDE_LOCATION")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    /// Raise the level to at least `debug` (the CLI's `--verbose`).
    pub fn verbose(mut self) -> Self {
        if matches!(parse_level(&self.log_level), Level::INFO | Level::WARN | Level::ERROR) {
            self.log_level = "debug".to_string();
        }
        self
    }
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Build the filter: `RUST_LOG` if set, else the configured level, plus any
/// target directives.
pub fn build_filter(config: &LogConfig) -> EnvFilter {
    let level = parse_level(&config.log_level);
    let mut env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if let Some(target_filter) = &config.target_filter {
        for filter in target_filter.split(',') {
            let filter = filter.trim();
            if !filter.is_empty() {
                if let Ok(directive) = filter.parse() {
                    env_filter = env_filter.add_directive(directive);
                } else {
                    eprintln!("Warning: Invalid log filter directive: {}", filter);
                }
            }
        }
    }
    env_filter
}

/// Install the global subscriber.
///
/// A subscriber that is already installed is left in place.
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_span_list(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    let filter = build_filter(config);
    let level = filter.to_string();
    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        // only fails when a global subscriber is already installed
        tracing::debug!("logging already initialised");
        return Ok(());
    }

    tracing::debug!(filter = %level, "logging initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("anything"), LogFormat::Pretty);
    }

    #[test]
    fn test_verbose_raises_level() {
        assert_eq!(LogConfig::default().verbose().log_level, "debug");
        let trace = LogConfig {
            log_level: "trace".into(),
            ..LogConfig::default()
        };
        assert_eq!(trace.verbose().log_level, "trace");
    }

    #[test]
    fn test_double_init_is_not_an_error() {
        let config = LogConfig::default();
        assert!(init_logging_with_config(&config).is_ok());
        assert!(init_logging_with_config(&config).is_ok());
    }
}
