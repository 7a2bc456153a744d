//! Error module for Nalu Link.
//!
//! Each data structure and subsystem owns a narrow error enum; [`NaluError`]
//! gathers them for the service layer and the binary. Errors that are logged
//! rather than returned go through the process-wide [`ErrorReporter`].

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::data_structures::base62::Base62Error;
use crate::data_structures::collision_resolver::CollisionError;
use crate::data_structures::niihau_trie::NiihauTrieError;

pub mod config;
pub mod store;

pub use store::StoreError;

/// Result type alias used throughout Nalu Link.
pub type NaluResult<T> = Result<T, NaluError>;

/// Core error enum for Nalu Link.
#[derive(Error, Debug)]
pub enum NaluError {
    /// Errors occurring during configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Errors raised by the link store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Short-code encoding or decoding failed.
    #[error("Short code error: {0}")]
    Codec(#[from] Base62Error),

    /// The URL trie rejected a key.
    #[error("Trie error: {0}")]
    Trie(#[from] NiihauTrieError),

    /// A short-code collision could not be resolved.
    #[error("Collision error: {0}")]
    Collision(#[from] CollisionError),

    /// The URL is malformed or uses an unsupported scheme.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The rejected input.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No link exists for the short code.
    #[error("Short code not found: {0}")]
    NotFound(String),

    /// IO errors that may occur during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/Deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Custom error with message for cases where specific error types are not defined.
    #[error("{0}")]
    Custom(String),
}

impl NaluError {
    /// Builds an [`NaluError::InvalidUrl`].
    pub fn invalid_url<U: Into<String>, R: Into<String>>(url: U, reason: R) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Returns whether the error was caused by caller input rather than by
    /// the store or the environment.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl { .. }
                | Self::NotFound(_)
                | Self::Codec(_)
                | Self::Trie(_)
                | Self::Collision(CollisionError::UnknownStrategy(_))
        )
    }
}

/// Error reporting structure to provide context and debugging information.
#[derive(Debug)]
pub struct ErrorContext {
    /// The original error that occurred.
    pub error: NaluError,

    /// The component where the error occurred.
    pub component: String,

    /// Additional context information to help with debugging.
    pub details: Option<String>,

    /// Stack trace information if available.
    pub trace: Option<String>,
}

impl ErrorContext {
    /// Creates a new error context with the given error and component.
    ///
    /// # Arguments
    ///
    /// * `error` - The error that occurred
    /// * `component` - The component where the error occurred
    pub fn new<S: Into<String>>(error: NaluError, component: S) -> Self {
        Self {
            error,
            component: component.into(),
            details: None,
            trace: None,
        }
    }

    /// Adds detail information to the error context.
    pub fn with_details<S: Into<String>>(mut self, details: S) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Adds stack trace information to the error context.
    pub fn with_trace<S: Into<String>>(mut self, trace: S) -> Self {
        self.trace = Some(trace.into());
        self
    }
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error in {}: {}", self.component, self.error)?;
        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }
        Ok(())
    }
}

/// Error reporter trait for reporting errors to various sinks.
pub trait ErrorReporter: Send + Sync + std::fmt::Debug {
    /// Report an error with context.
    fn report(&self, context: ErrorContext);
}

/// Error reporter that logs through the tracing framework.
#[derive(Default, Debug)]
pub struct TracingErrorReporter;

impl TracingErrorReporter {
    /// Creates a new tracing reporter.
    pub fn new() -> Self {
        Self
    }
}

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, context: ErrorContext) {
        tracing::error!(
            error = %context.error,
            component = %context.component,
            details = context.details.as_deref().unwrap_or("None"),
            trace = context.trace.as_deref().unwrap_or("None"),
            "Error reported"
        );
    }
}

/// Process-wide error reporter, installed at most once.
static ERROR_REPORTER: OnceCell<Arc<dyn ErrorReporter>> = OnceCell::new();

/// Installs the process-wide error reporter.
///
/// Returns `false` if a reporter was already installed; the first one wins.
pub fn set_error_reporter(reporter: Arc<dyn ErrorReporter>) -> bool {
    let installed = ERROR_REPORTER.set(reporter).is_ok();
    if !installed {
        tracing::debug!("Error reporter already installed, keeping the existing one");
    }
    installed
}

/// Returns the installed reporter, if any.
pub fn error_reporter() -> Option<&'static Arc<dyn ErrorReporter>> {
    ERROR_REPORTER.get()
}

/// Reports an error through the installed reporter.
///
/// Falls back to a `tracing` event when no reporter has been installed.
pub fn report_error(context: ErrorContext) {
    match ERROR_REPORTER.get() {
        Some(reporter) => reporter.report(context),
        None => TracingErrorReporter.report(context),
    }
}
