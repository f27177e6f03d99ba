//! # Daedalus Telemetry
//!
//! Structured logging for Daedalus services.
//!
//! This crate wires `tracing` output through `tracing-subscriber`:
//! JSON-formatted logs for production, human-readable output for
//! development, with an `EnvFilter`-driven level (the `RUST_LOG`
//! environment variable overrides the configured default).
//!
//! # Example
//!
//! ```rust,ignore
//! use daedalus_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::info!(project_id = %id, "ingestion started");
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod logging;

pub use logging::{init_logging, LogConfig, TelemetryError};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
