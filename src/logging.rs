//! Structured logging setup.
//!
//! The library only emits `tracing` events; the binary decides where they
//! go. Events are written to stderr so CLI output on stdout stays clean.
//! `RUST_LOG` wins over the configured level unless an explicit filter
//! string is supplied.
//!
//! ```rust,ignore
//! use diode_lab::logging::{init_logging, LogConfig, LogFormat};
//!
//! init_logging(&LogConfig { format: LogFormat::Json, ..Default::default() });
//! tracing::info!(port = 5000, "listening");
//! ```

use std::fmt;

use clap::ValueEnum;
use tracing_subscriber::{fmt as tfmt, prelude::*, EnvFilter};

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable, multi-line
    #[default]
    Pretty,
    /// One line per event
    Compact,
    /// Machine-readable
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Directive string, e.g. "diode_lab=debug,tower_http=info"
    pub filter: Option<String>,
}

impl LogConfig {
    /// Build the env filter this configuration resolves to.
    pub fn env_filter(&self) -> EnvFilter {
        let fallback = || EnvFilter::new(self.level.to_string());
        match self.filter {
            Some(ref custom) => EnvFilter::try_new(custom).unwrap_or_else(|_| fallback()),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback()),
        }
    }
}

/// Initialize the global subscriber. Later calls are ignored.
pub fn init_logging(config: &LogConfig) {
    let filter = config.env_filter();
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(tfmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(tfmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(tfmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };

    // Already initialised (e.g. by a test harness)
    let _ = result;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Debug.to_string(), "debug");
        assert_eq!(LogLevel::default().to_string(), "info");
    }

    #[test]
    fn test_explicit_filter_wins() {
        let config = LogConfig {
            filter: Some("diode_lab=trace".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.env_filter().max_level_hint(),
            Some(tracing_subscriber::filter::LevelFilter::TRACE)
        );
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(&LogConfig::default());
        init_logging(&LogConfig {
            format: LogFormat::Json,
            ..Default::default()
        });
    }
}
