//! Logging setup for applications embedding the catalog
//!
//! Store operations emit `tracing` events: `debug` for file reads and
//! writes, `info` for completed changes and unknown ids, `warn` for rejected
//! candidates and patches. Nothing is printed until a subscriber is
//! installed, for example with [`init_logging`].
//!
//! # Example
//!
//! ```no_run
//! use catalog_core::logging::init_logging;
//! use catalog_core::store::JsonFileStore;
//!
//! # async fn run() -> catalog_core::Result<()> {
//! init_logging("logs", "catalog.log", "info")?;
//!
//! // Each add, delete and update now leaves a line in logs/catalog.log.<date>
//! let store = JsonFileStore::open("products.json");
//! store.load().await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a global subscriber writing to stdout and to a daily-rotated file
///
/// - `directory`: Directory to store logs, created if missing
/// - `filename_prefix`: Prefix for log files (e.g. "catalog.log")
/// - `level`: Default filter (e.g. "info", "catalog_core=debug"), overridden by `RUST_LOG`
///
/// The file receives one JSON object per event.
pub fn init_logging(directory: &str, filename_prefix: &str, level: &str) -> Result<()> {
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(filename_prefix)
        .build(directory)
        .map_err(|e| Error::internal(format!("Failed to create log appender: {}", e)))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .with(fmt::layer().json().with_writer(file_appender))
        .try_init()
        .map_err(|e| Error::internal(format!("Failed to init tracing: {}", e)))
}
