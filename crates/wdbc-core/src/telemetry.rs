//! Tracing subscriber setup for the service binaries.
//!
//! Call [`init_tracing`] once at program start. `RUST_LOG` takes precedence
//! over the supplied level; without it, the service logs at `level` and
//! keeps the HTTP stack's internals at `warn`.

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Text,
    /// Newline-delimited JSON, one object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(level: Level) -> String {
    format!("{},hyper=warn,h2=warn", level.as_str().to_ascii_lowercase())
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_tracing(format: LogFormat, level: Level) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().flatten_event(true).with_current_span(true))
            .try_init(),
        LogFormat::Text => registry.with(fmt::layer().with_target(false)).try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_log_format() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("TEXT".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn default_filter_quiets_http_internals() {
        assert_eq!(default_filter(Level::DEBUG), "debug,hyper=warn,h2=warn");
    }

    #[test]
    fn second_init_reports_error() {
        let _ = init_tracing(LogFormat::Text, Level::INFO);
        assert!(init_tracing(LogFormat::Json, Level::DEBUG).is_err());
    }
}
