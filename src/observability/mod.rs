//! Logging setup for command-line applications.
//!
//! The library itself only emits `tracing` events. Binaries that want to see
//! them install a subscriber once at startup.
//!
//! # Example
//!
//! ```no_run
//! use cmdkit::observability::init_logging;
//!
//! // CMDKIT_LOG=debug overrides the default level
//! init_logging("warn").unwrap();
//! ```

pub mod logger;

pub use logger::{init_logging, LOG_ENV};
