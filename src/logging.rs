/// Structured logging for the forecast client
///
/// Events are emitted through `tracing` and tagged with the data source and,
/// where one applies, the region code. The subscriber writes to stderr or to
/// a log file chosen in the configuration.

use crate::model::JmaError;
use std::fmt;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Area,
    Forecast,
    Cache,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Area => write!(f, "AREA"),
            DataSource::Forecast => write!(f, "FORECAST"),
            DataSource::Cache => write!(f, "CACHE"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - the region code has no forecast document
    Expected,
    /// Unexpected failure - service degradation, network trouble or an API change
    Unexpected,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Subscriber Setup
// ---------------------------------------------------------------------------

/// Install the global subscriber.
///
/// An unparseable `level` falls back to `info`. When a subscriber is already
/// installed it stays in place, and this call's level and file are reported
/// at debug level instead of applied.
pub fn init_logger(level: &str, log_file: Option<&Path>) -> std::io::Result<()> {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    if let Err(e) = installed {
        let target = log_file.map_or_else(|| "stderr".to_string(), |p| p.display().to_string());
        debug(
            DataSource::System,
            None,
            &format!(
                "Logger already installed, ignoring level '{}' and output {}: {}",
                level, target, e
            ),
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

pub fn info(source: DataSource, code: Option<&str>, message: &str) {
    tracing::info!(source = %source, code = code.unwrap_or("-"), "{}", message);
}

pub fn warn(source: DataSource, code: Option<&str>, message: &str) {
    tracing::warn!(source = %source, code = code.unwrap_or("-"), "{}", message);
}

pub fn error(source: DataSource, code: Option<&str>, message: &str) {
    tracing::error!(source = %source, code = code.unwrap_or("-"), "{}", message);
}

pub fn debug(source: DataSource, code: Option<&str>, message: &str) {
    tracing::debug!(source = %source, code = code.unwrap_or("-"), "{}", message);
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// A 404 means JMA publishes nothing for that code; everything else points at
/// the network or at a changed document format.
pub fn classify_fetch_failure(err: &JmaError) -> FailureType {
    match err {
        JmaError::HttpStatus(404) => FailureType::Expected,
        JmaError::HttpStatus(_) | JmaError::Transport(_) | JmaError::Format(_) => {
            FailureType::Unexpected
        }
    }
}

/// Log a fetch failure with automatic classification
pub fn log_fetch_failure(source: DataSource, code: &str, operation: &str, err: &JmaError) {
    let failure_type = classify_fetch_failure(err);
    let message = format!("{} failed [{}]: {}", operation, failure_type, err);

    match failure_type {
        FailureType::Expected => debug(source, Some(code), &message),
        FailureType::Unexpected => error(source, Some(code), &message),
    }
}

/// Log how many cache upserts of one navigation step went through
pub fn log_persist_summary(code: &str, written: usize, failed: usize) {
    let message = format!(
        "Cache update complete: {}/{} written, {} failed",
        written,
        written + failed,
        failed
    );

    if failed == 0 {
        info(DataSource::Cache, Some(code), &message);
    } else if written == 0 {
        error(DataSource::Cache, Some(code), &message);
    } else {
        warn(DataSource::Cache, Some(code), &message);
    }
}
