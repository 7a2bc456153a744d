//! Nalu Link Library
//!
//! The in-process core of a URL shortener: hand-built data structures for
//! short-code lookup, recency caching, prefix search, popularity ranking and
//! collision resolution, plus the service that wires them to a link store.
//!
//! # Architecture
//!
//! - [`data_structures`]: the structures themselves, free of I/O and locking
//! - [`service`]: the store seam and the operations built on top of it
//! - [`config`]: layered, validated settings
//! - [`error`]: error types and the process-wide error reporter

// Re-export public modules
pub mod config;
pub mod data_structures;
pub mod error;
pub mod service;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

// Feature-gated modules
#[cfg(feature = "benchmarking")]
pub mod bench;

/// Version information for Nalu Link.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library initialization function.
///
/// Installs the tracing error reporter unless one is already in place.
pub fn init() {
    error::set_error_reporter(std::sync::Arc::new(error::TracingErrorReporter::new()));
}
