//! Logging setup using `tracing`.
//!
//! Level comes from the argument, then `SPEC_DIAGRAM_LOG_LEVEL`, then
//! `RUST_LOG`, defaulting to `warn` so diagram output on stdout stays clean.
//! Format comes from the argument, then `SPEC_DIAGRAM_LOG_FORMAT`, defaulting
//! to `compact`. Logs always go to stderr.

use std::str::FromStr;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line format
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!(
                "Unknown log format: {}. Valid options: {}",
                s,
                LogFormat::variants().join(", ")
            )),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Initialize the global subscriber.
///
/// Fails when the format is unknown or a subscriber is already installed.
pub fn init_logging(level: Option<&str>, format: Option<&str>) -> anyhow::Result<()> {
    let log_level = level
        .map(|s| s.to_string())
        .or_else(|| std::env::var("SPEC_DIAGRAM_LOG_LEVEL").ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "warn".to_string());

    let log_format = format
        .map(|s| s.to_string())
        .or_else(|| std::env::var("SPEC_DIAGRAM_LOG_FORMAT").ok())
        .unwrap_or_else(|| "compact".to_string());

    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    let format = LogFormat::from_str(&log_format).map_err(|e| anyhow::anyhow!(e))?;

    match format {
        LogFormat::Compact => Registry::default()
            .with(filter)
            .with(
                fmt::Layer::default()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_span_events(FmtSpan::NONE)
                    .compact(),
            )
            .try_init()?,
        LogFormat::Pretty => Registry::default()
            .with(filter)
            .with(
                fmt::Layer::default()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::ACTIVE)
                    .pretty(),
            )
            .try_init()?,
        LogFormat::Json => Registry::default()
            .with(filter)
            .with(
                fmt::Layer::default()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .json(),
            )
            .try_init()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
        assert_eq!(LogFormat::from_str("PRETTY").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str("xml").is_err());
        assert!(LogFormat::variants().contains(&"json"));
    }

    #[test]
    fn test_invalid_format_rejected() {
        assert!(init_logging(Some("info"), Some("invalid_format")).is_err());
    }
}
