//! Test modules for Nalu Link.
//!
//! Unit tests for the individual data structures live next to them; this
//! module holds the cross-cutting suites:
//! - configuration layering and validation
//! - error types and reporting
//! - the link service against a mocked store
//! - shared fixtures and proptest strategies

pub mod config_tests;
pub mod service_tests;

// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{
    create_test_dir, record_strategy, url_strategy, CountingReporter, TestFixture,
};
