//! Tracing subscriber setup for hosts embedding the practice services.

use std::env;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoggingError {
    #[error("invalid log format `{0}`, expected text, json or pretty")]
    InvalidFormat(String),
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Plain single-line output without colors.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
    /// Multi-line, colored output for development.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(LoggingError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
            LogFormat::Pretty => write!(f, "pretty"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset, e.g. `info` or `services=debug`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Read `PRACTICE_LOG_FORMAT` and `PRACTICE_LOG`.
    ///
    /// # Errors
    ///
    /// Returns `LoggingError::InvalidFormat` for an unknown format name.
    pub fn from_env() -> Result<Self, LoggingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoggingError> {
        let defaults = Self::default();
        let format = match lookup("PRACTICE_LOG_FORMAT") {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => defaults.format,
        };
        let level = lookup("PRACTICE_LOG")
            .filter(|level| !level.trim().is_empty())
            .unwrap_or(defaults.level);
        Ok(Self { format, level })
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    /// Install the global subscriber. Logs go to stderr.
    ///
    /// # Errors
    ///
    /// Returns `LoggingError::AlreadyInitialized` if a subscriber exists.
    pub fn try_init(&self) -> Result<(), LoggingError> {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(self.filter())
            .with_writer(std::io::stderr)
            .with_target(true);

        let result = match self.format {
            LogFormat::Json => builder
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .try_init(),
            LogFormat::Pretty => builder.pretty().try_init(),
            LogFormat::Text => builder.with_ansi(false).try_init(),
        };
        result.map_err(|_| LoggingError::AlreadyInitialized)
    }
}
